use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dopamine_core::routing::RouteConfig;

/// Dopamine - auth gate for the todo list
#[derive(Parser, Debug)]
#[command(name = "dopamine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a sequence of auth actions and navigations against a mock provider
    Run(RunArgs),
    /// Load the provider configuration from the environment and print it
    Config,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Steps to replay in order: `sign-in`, `sign-out` or a path such as `/app`
    #[arg(required = true)]
    pub steps: Vec<Step>,

    /// Start with a cached session for this user id
    #[arg(long)]
    pub signed_in: Option<String>,

    /// Make the first sign-in fail with this message
    #[arg(long)]
    pub fail_sign_in: Option<String>,

    /// How navigations wait for the first provider notification
    #[arg(long, value_enum, default_value_t = Readiness::Await)]
    pub readiness: Readiness,

    /// Paths that require a signed-in user
    #[arg(
        long = "protected",
        env = "DOPAMINE_PROTECTED_PATHS",
        value_delimiter = ',',
        default_value = "/app"
    )]
    pub protected: Vec<String>,

    /// Where anonymous visitors are sent
    #[arg(long, env = "DOPAMINE_LOGIN_PATH", default_value = "/login")]
    pub login_path: String,

    /// Where signed-in users land when they open the login page
    #[arg(long, env = "DOPAMINE_LANDING_PATH", default_value = "/app")]
    pub landing_path: String,
}

impl RunArgs {
    pub fn route_config(&self) -> Result<RouteConfig, dopamine_core::auth::AuthError> {
        RouteConfig::new(
            self.protected.iter().cloned(),
            self.login_path.clone(),
            self.landing_path.clone(),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Readiness {
    /// Suspend each navigation until the mirror is initialized
    #[default]
    Await,
    /// Check the initialized flag and defer while it is unset
    Flag,
}

/// One replayed step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    SignIn,
    SignOut,
    Navigate(String),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign-in" => Ok(Self::SignIn),
            "sign-out" => Ok(Self::SignOut),
            target if target.starts_with('/') => Ok(Self::Navigate(target.to_string())),
            other => Err(format!(
                "unknown step '{other}': expected sign-in, sign-out or a path starting with /"
            )),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignIn => write!(f, "sign-in"),
            Self::SignOut => write!(f, "sign-out"),
            Self::Navigate(target) => write!(f, "{target}"),
        }
    }
}
