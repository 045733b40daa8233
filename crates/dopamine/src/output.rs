//! Human-readable and JSON rendering of replay reports.

use dopamine_auth::FirebaseConfig;
use dopamine_core::auth::AuthSnapshot;
use dopamine_core::routing::GuardOutcome;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::replay::StepReport;

/// Renders any serializable value as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

pub fn format_reports(reports: &[StepReport], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&reports),
        OutputFormat::Pretty => reports
            .iter()
            .map(format_report)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn format_report(report: &StepReport) -> String {
    let result = match (&report.navigation, report.ok) {
        (Some(outcome), _) => format_outcome(outcome),
        (None, Some(true)) => "ok".to_string(),
        (None, Some(false)) => "failed".to_string(),
        (None, None) => "-".to_string(),
    };

    let deferred = if report.deferred { " (deferred)" } else { "" };

    format!(
        "{:<16} -> {:<24} [{}]",
        report.step,
        format!("{result}{deferred}"),
        format_state(&report.state)
    )
}

fn format_outcome(outcome: &GuardOutcome) -> String {
    match outcome {
        GuardOutcome::Pending => "pending".to_string(),
        GuardOutcome::Allow => "allow".to_string(),
        GuardOutcome::RedirectToLogin(to) | GuardOutcome::RedirectToLanding(to) => {
            format!("redirect {to}")
        }
    }
}

fn format_state(state: &AuthSnapshot) -> String {
    let who = match &state.principal {
        Some(principal) => principal.to_string(),
        None if state.initialized => "anonymous".to_string(),
        None => "unknown".to_string(),
    };

    match &state.last_error {
        Some(error) => format!("{who}, error: {error}"),
        None => who,
    }
}

pub fn format_config(config: &FirebaseConfig, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(config),
        OutputFormat::Pretty => {
            let optional = |v: Option<&str>| v.unwrap_or("-").to_string();
            format!(
                "Provider configuration:\n  API key:       <redacted>\n  Auth domain:   {}\n  Project ID:    {}\n  App ID:        {}\n  Storage:       {}\n  Sender ID:     {}\n  Hosting URL:   {}",
                config.auth_domain,
                config.project_id,
                config.app_id,
                optional(config.storage_bucket.as_deref()),
                optional(config.messaging_sender_id.as_deref()),
                optional(config.hosting_url.as_ref().map(|u| u.as_str())),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use dopamine_core::auth::Principal;

    use super::*;

    fn report(step: &str) -> StepReport {
        StepReport {
            step: step.to_string(),
            navigation: None,
            ok: None,
            deferred: false,
            state: AuthSnapshot {
                principal: None,
                is_loading: false,
                last_error: None,
                initialized: true,
            },
        }
    }

    #[test]
    fn pretty_navigation_line() {
        let mut r = report("/app");
        r.navigation = Some(GuardOutcome::RedirectToLogin("/login".into()));

        let line = format_report(&r);
        assert!(line.starts_with("/app"));
        assert!(line.contains("redirect /login"));
        assert!(line.ends_with("[anonymous]"));
    }

    #[test]
    fn pretty_action_line_with_error() {
        let mut r = report("sign-in");
        r.ok = Some(false);
        r.state.last_error = Some("sign-in failed: popup closed".into());

        let line = format_report(&r);
        assert!(line.contains("failed"));
        assert!(line.contains("anonymous, error: sign-in failed: popup closed"));
    }

    #[test]
    fn pretty_marks_deferred_and_principal() {
        let mut r = report("/login");
        r.navigation = Some(GuardOutcome::RedirectToLanding("/app".into()));
        r.deferred = true;
        r.state.principal = Some(Principal::new("uid-1").with_email("ada@example.com"));

        let line = format_report(&r);
        assert!(line.contains("redirect /app (deferred)"));
        assert!(line.contains("[uid-1 <ada@example.com>]"));
    }

    #[test]
    fn uninitialized_state_is_unknown() {
        assert_eq!(format_state(&AuthSnapshot::default()), "unknown");
    }

    #[test]
    fn json_reports_are_an_array() {
        let reports = vec![report("/"), report("sign-out")];

        let json: serde_json::Value =
            serde_json::from_str(&format_reports(&reports, OutputFormat::Json)).unwrap();

        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["step"], "sign-out");
    }
}
