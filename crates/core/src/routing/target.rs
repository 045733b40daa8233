/// Extracts the path component of a navigation target.
///
/// Navigation targets may carry a query string or a fragment; gating only
/// looks at the path. An empty path is treated as the root.
///
/// # Examples
///
/// ```
/// use dopamine_core::routing::target_path;
///
/// assert_eq!(target_path("/app?tab=done"), "/app");
/// assert_eq!(target_path("/login#top"), "/login");
/// assert_eq!(target_path("?q=1"), "/");
/// ```
pub fn target_path(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());

    match &target[..end] {
        "" => "/",
        path => path,
    }
}

/// Validates a configured route path.
///
/// Returns `Some(path)` if the path is usable as a gate, `None` otherwise.
///
/// A route path must:
/// - start with a single `/`
/// - not contain control characters
/// - not carry a query string or fragment (gating matches on path only)
///
/// # Examples
///
/// ```
/// use dopamine_core::routing::validate_route_path;
///
/// assert_eq!(validate_route_path("/app"), Some("/app"));
/// assert_eq!(validate_route_path("app"), None);
/// assert_eq!(validate_route_path("//evil.com"), None);
/// assert_eq!(validate_route_path("/app?x=1"), None);
/// ```
pub fn validate_route_path(path: &str) -> Option<&str> {
    if !path.starts_with('/') {
        return None;
    }

    // Protocol-relative, would never match a navigation path
    if path.starts_with("//") {
        return None;
    }

    if path.chars().any(|c| c.is_control()) {
        return None;
    }

    if path.contains(['?', '#']) {
        return None;
    }

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== target_path tests ====================

    #[test]
    fn plain_path_is_unchanged() {
        assert_eq!(target_path("/app"), "/app");
        assert_eq!(target_path("/"), "/");
    }

    #[test]
    fn strips_query_string() {
        assert_eq!(target_path("/app?filter=today&sort=asc"), "/app");
    }

    #[test]
    fn strips_fragment() {
        assert_eq!(target_path("/login#form"), "/login");
    }

    #[test]
    fn strips_fragment_that_contains_question_mark() {
        assert_eq!(target_path("/app#what?"), "/app");
    }

    #[test]
    fn empty_target_is_root() {
        assert_eq!(target_path(""), "/");
        assert_eq!(target_path("#top"), "/");
    }

    #[test]
    fn trailing_slash_is_kept() {
        // Matching is exact: `/app/` is a different route from `/app`
        assert_eq!(target_path("/app/"), "/app/");
    }

    // ==================== validate_route_path tests ====================

    #[test]
    fn accepts_nested_path() {
        assert_eq!(validate_route_path("/app/settings"), Some("/app/settings"));
    }

    #[test]
    fn accepts_root() {
        assert_eq!(validate_route_path("/"), Some("/"));
    }

    #[test]
    fn rejects_relative_path() {
        assert_eq!(validate_route_path("login"), None);
        assert_eq!(validate_route_path(""), None);
    }

    #[test]
    fn rejects_protocol_relative() {
        assert_eq!(validate_route_path("//app"), None);
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(validate_route_path("/app\n"), None);
        assert_eq!(validate_route_path("/a\tpp"), None);
    }

    #[test]
    fn rejects_query_and_fragment() {
        assert_eq!(validate_route_path("/login?next=/app"), None);
        assert_eq!(validate_route_path("/login#x"), None);
    }
}
