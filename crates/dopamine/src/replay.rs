//! Replays a scripted session against the auth mirror and route guard.

use dopamine_auth::{AuthError, RouteGuard};
use dopamine_core::auth::AuthSnapshot;
use dopamine_core::routing::GuardOutcome;
use serde::Serialize;

use crate::cli::{Readiness, Step};

/// What happened for one step, plus the auth state right after it.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    /// Navigation result; absent for actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<GuardOutcome>,
    /// Action result; absent for navigations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    /// Set when a flag-based navigation had to wait for the next attempt.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deferred: bool,
    pub state: AuthSnapshot,
}

/// Runs every step in order and collects one report per step.
///
/// # Errors
///
/// Fails only when the mirror cannot subscribe to the provider.
pub async fn replay(
    guard: &RouteGuard,
    steps: &[Step],
    readiness: Readiness,
) -> Result<Vec<StepReport>, AuthError> {
    let mut reports = Vec::with_capacity(steps.len());

    if readiness == Readiness::Flag {
        // Subscribe up front, as an app would on mount
        guard.mirror().start();
    }

    for step in steps {
        let mut report = StepReport {
            step: step.to_string(),
            navigation: None,
            ok: None,
            deferred: false,
            state: AuthSnapshot::default(),
        };

        match step {
            Step::SignIn => report.ok = Some(guard.mirror().sign_in().await),
            Step::SignOut => report.ok = Some(guard.mirror().sign_out().await),
            Step::Navigate(target) => match readiness {
                Readiness::Await => report.navigation = Some(guard.evaluate(target).await?),
                Readiness::Flag => {
                    let mut outcome = guard.check(target);
                    if outcome.is_pending() {
                        // The router would hold this navigation; try again
                        // once the background subscription has answered.
                        report.deferred = true;
                        guard.mirror().initialize().await?;
                        outcome = guard.check(target);
                    }
                    report.navigation = Some(outcome);
                }
            },
        }

        report.state = guard.mirror().snapshot();
        reports.push(report);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dopamine_auth::{AuthMirror, MockProvider};
    use dopamine_core::auth::Principal;
    use dopamine_core::routing::RouteConfig;

    use super::*;

    fn guard(provider: MockProvider) -> RouteGuard {
        RouteGuard::new(
            AuthMirror::new(Arc::new(provider)),
            RouteConfig::default(),
        )
    }

    fn steps(raw: &[&str]) -> Vec<Step> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[tokio::test]
    async fn anonymous_session_is_sent_to_login_then_into_app() {
        let guard = guard(MockProvider::new());

        let reports = replay(
            &guard,
            &steps(&["/app", "sign-in", "/login", "/app"]),
            Readiness::Await,
        )
        .await
        .unwrap();

        assert_eq!(
            reports[0].navigation,
            Some(GuardOutcome::RedirectToLogin("/login".into()))
        );
        assert_eq!(reports[1].ok, Some(true));
        assert!(reports[1].state.is_authenticated());
        assert_eq!(
            reports[2].navigation,
            Some(GuardOutcome::RedirectToLanding("/app".into()))
        );
        assert_eq!(reports[3].navigation, Some(GuardOutcome::Allow));
    }

    #[tokio::test]
    async fn failed_sign_in_is_reported_with_error() {
        let provider = MockProvider::new();
        provider.fail_next_sign_in("popup closed by user");
        let guard = guard(provider);

        let reports = replay(&guard, &steps(&["sign-in", "/app"]), Readiness::Await)
            .await
            .unwrap();

        assert_eq!(reports[0].ok, Some(false));
        assert!(reports[0]
            .state
            .last_error
            .as_deref()
            .unwrap()
            .contains("popup closed by user"));
        assert!(!reports[0].state.is_loading);
        assert_eq!(
            reports[1].navigation,
            Some(GuardOutcome::RedirectToLogin("/login".into()))
        );
    }

    #[tokio::test]
    async fn flag_readiness_defers_first_navigation_only() {
        let guard = guard(MockProvider::signed_in(Principal::new("uid-1")));

        let reports = replay(&guard, &steps(&["/login", "/app"]), Readiness::Flag)
            .await
            .unwrap();

        assert!(reports[0].deferred);
        assert_eq!(
            reports[0].navigation,
            Some(GuardOutcome::RedirectToLanding("/app".into()))
        );
        assert!(!reports[1].deferred);
        assert_eq!(reports[1].navigation, Some(GuardOutcome::Allow));
    }

    #[tokio::test]
    async fn sign_out_closes_app() {
        let guard = guard(MockProvider::signed_in(Principal::new("uid-1")));

        let reports = replay(&guard, &steps(&["/app", "sign-out", "/app"]), Readiness::Await)
            .await
            .unwrap();

        assert_eq!(reports[0].navigation, Some(GuardOutcome::Allow));
        assert_eq!(reports[1].ok, Some(true));
        assert!(!reports[1].state.is_authenticated());
        assert_eq!(
            reports[2].navigation,
            Some(GuardOutcome::RedirectToLogin("/login".into()))
        );
    }

    #[tokio::test]
    async fn report_serializes_only_relevant_fields() {
        let guard = guard(MockProvider::new());

        let reports = replay(&guard, &steps(&["/app", "sign-in"]), Readiness::Await)
            .await
            .unwrap();

        let navigation = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(navigation["step"], "/app");
        assert_eq!(navigation["navigation"]["outcome"], "redirect_to_login");
        assert!(navigation.get("ok").is_none());
        assert!(navigation.get("deferred").is_none());

        let action = serde_json::to_value(&reports[1]).unwrap();
        assert_eq!(action["ok"], true);
        assert!(action.get("navigation").is_none());
    }
}
