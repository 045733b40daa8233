use serde::{Deserialize, Serialize};

/// Identity handed back by the provider.
///
/// Only presence or absence is meaningful to routing. The profile fields are
/// carried through untouched for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Provider's unique user identifier.
    pub uid: String,
    /// User's email address.
    pub email: Option<String>,
    /// User's display name.
    pub display_name: Option<String>,
}

impl Principal {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{}>", self.uid, email),
            None => write!(f, "{}", self.uid),
        }
    }
}

/// Point-in-time copy of the mirrored auth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub principal: Option<Principal>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    /// Set once, by the first provider notification.
    pub initialized: bool,
}

impl AuthSnapshot {
    /// Derived from `principal`, never stored.
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

impl Default for AuthSnapshot {
    /// State at process start: nothing known yet, waiting on the provider.
    fn default() -> Self {
        Self {
            principal: None,
            is_loading: true,
            last_error: None,
            initialized: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_loading_and_uninitialized() {
        let snapshot = AuthSnapshot::default();
        assert!(snapshot.is_loading);
        assert!(!snapshot.initialized);
        assert!(snapshot.principal.is_none());
        assert!(snapshot.last_error.is_none());
    }

    #[test]
    fn is_authenticated_follows_principal() {
        let mut snapshot = AuthSnapshot::default();
        assert!(!snapshot.is_authenticated());

        snapshot.principal = Some(Principal::new("uid-1"));
        assert!(snapshot.is_authenticated());

        snapshot.principal = None;
        assert!(!snapshot.is_authenticated());
    }

    #[test]
    fn principal_display_includes_email_when_present() {
        assert_eq!(Principal::new("uid-1").to_string(), "uid-1");
        assert_eq!(
            Principal::new("uid-1")
                .with_email("ada@example.com")
                .to_string(),
            "uid-1 <ada@example.com>"
        );
    }

    #[test]
    fn snapshot_serializes_with_snake_case_fields() {
        let snapshot = AuthSnapshot {
            principal: Some(Principal::new("uid-1").with_display_name("Ada")),
            is_loading: false,
            last_error: None,
            initialized: true,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["principal"]["uid"], "uid-1");
        assert_eq!(json["principal"]["display_name"], "Ada");
        assert_eq!(json["is_loading"], false);
        assert_eq!(json["initialized"], true);
    }
}
