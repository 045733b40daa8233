use crate::auth::AuthError;

use super::validate_route_path;

/// Static gate configuration: which paths need a principal, where to send
/// anonymous visitors and where signed-in users land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    protected: Vec<String>,
    login_path: String,
    landing_path: String,
}

impl RouteConfig {
    /// Builds a validated route configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRoute` if any path is malformed, if the
    /// login path is protected, or if the landing path is the login path.
    /// The last two would make the guard redirect in a loop.
    pub fn new<I, S>(
        protected: I,
        login_path: impl Into<String>,
        landing_path: impl Into<String>,
    ) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let login_path = checked(login_path.into())?;
        let landing_path = checked(landing_path.into())?;

        let mut paths = Vec::new();
        for path in protected {
            let path = checked(path.into())?;
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        if paths.contains(&login_path) {
            return Err(AuthError::InvalidRoute(format!(
                "login path {login_path} cannot be protected"
            )));
        }

        if landing_path == login_path {
            return Err(AuthError::InvalidRoute(format!(
                "landing path cannot be the login path ({login_path})"
            )));
        }

        Ok(Self {
            protected: paths,
            login_path,
            landing_path,
        })
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.iter().any(|p| p == path)
    }

    pub fn protected(&self) -> &[String] {
        &self.protected
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            protected: vec!["/app".to_string()],
            login_path: "/login".to_string(),
            landing_path: "/app".to_string(),
        }
    }
}

fn checked(path: String) -> Result<String, AuthError> {
    match validate_route_path(&path) {
        Some(_) => Ok(path),
        None => Err(AuthError::InvalidRoute(format!(
            "{path:?} is not an absolute route path"
        ))),
    }
}
