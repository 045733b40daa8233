use serde::Serialize;

use crate::auth::AuthSnapshot;

use super::{target_path, RouteConfig};

/// Result of a single guard evaluation.
///
/// Terminal per navigation: nothing is retained between evaluations apart from
/// the shared auth state itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "to", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// The first provider notification has not arrived. No decision taken.
    Pending,
    /// Navigation proceeds unchanged.
    Allow,
    /// Anonymous visitor on a protected path.
    RedirectToLogin(String),
    /// Signed-in user on the login path.
    RedirectToLanding(String),
}

impl GuardOutcome {
    /// Where the navigation should go instead, if anywhere.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::RedirectToLogin(to) | Self::RedirectToLanding(to) => Some(to),
            Self::Pending | Self::Allow => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Decides what to do with a navigation to `target`.
///
/// Returns `Pending` until the snapshot is initialized. After that the loading
/// flag is ignored: an in-flight sign-in must not open protected paths.
pub fn decide(config: &RouteConfig, target: &str, snapshot: &AuthSnapshot) -> GuardOutcome {
    if !snapshot.initialized {
        return GuardOutcome::Pending;
    }

    let path = target_path(target);
    let authenticated = snapshot.is_authenticated();

    if !authenticated && config.is_protected(path) {
        return GuardOutcome::RedirectToLogin(config.login_path().to_string());
    }

    if authenticated && path == config.login_path() {
        return GuardOutcome::RedirectToLanding(config.landing_path().to_string());
    }

    GuardOutcome::Allow
}
