//! Navigation guard.
//!
//! Runs before each navigation and turns the mirrored auth state into an
//! allow/redirect decision. Two readiness mechanisms are offered:
//! [`RouteGuard::evaluate`] waits for the mirror to initialize, while
//! [`RouteGuard::check`] never waits and reports `Pending` instead, leaving the
//! navigation layer to try again on the next navigation.

use dopamine_core::routing::{decide, GuardOutcome, RouteConfig};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::mirror::AuthMirror;

#[derive(Debug, Clone)]
pub struct RouteGuard {
    mirror: AuthMirror,
    routes: RouteConfig,
}

impl RouteGuard {
    pub fn new(mirror: AuthMirror, routes: RouteConfig) -> Self {
        Self { mirror, routes }
    }

    /// Decides a navigation, suspending until the mirror has received its
    /// first provider notification.
    ///
    /// # Errors
    ///
    /// Propagates initialization failures from [`AuthMirror::initialize`].
    pub async fn evaluate(&self, target: &str) -> Result<GuardOutcome, AuthError> {
        if !self.mirror.is_initialized() {
            debug!(dest = target, "Waiting for auth state before routing");
            self.mirror.initialize().await?;
        }

        Ok(self.decide(target))
    }

    /// Decides a navigation without waiting.
    ///
    /// Returns `GuardOutcome::Pending` while the mirror is uninitialized. This
    /// never subscribes to the provider: call [`AuthMirror::start`] once at
    /// startup, or the outcome stays `Pending`.
    pub fn check(&self, target: &str) -> GuardOutcome {
        self.decide(target)
    }

    fn decide(&self, target: &str) -> GuardOutcome {
        let outcome = decide(&self.routes, target, &self.mirror.snapshot());

        match &outcome {
            GuardOutcome::Pending => debug!(dest = target, "Auth state not ready, deferring"),
            GuardOutcome::Allow => debug!(dest = target, "Navigation allowed"),
            GuardOutcome::RedirectToLogin(to) => {
                info!(from = target, to = %to, "Not authenticated, redirecting to login")
            }
            GuardOutcome::RedirectToLanding(to) => {
                info!(from = target, to = %to, "Already authenticated, redirecting to app")
            }
        }

        outcome
    }

    pub fn mirror(&self) -> &AuthMirror {
        &self.mirror
    }

    pub fn routes(&self) -> &RouteConfig {
        &self.routes
    }
}
