mod cli;
mod output;
mod replay;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dopamine_auth::{AuthMirror, FirebaseConfig, MockProvider, RouteGuard};
use dopamine_core::auth::Principal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, RunArgs};
use crate::output::{format_config, format_reports};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dopamine=debug,dopamine_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run(args) => run(args, cli.format).await?,
        Commands::Config => {
            let config = FirebaseConfig::from_env()
                .context("provider configuration is incomplete")?;
            println!("{}", format_config(&config, cli.format));
        }
    }

    Ok(())
}

async fn run(args: RunArgs, format: cli::OutputFormat) -> Result<()> {
    let routes = args.route_config().context("invalid route configuration")?;

    let provider = match &args.signed_in {
        Some(uid) => MockProvider::signed_in(Principal::new(uid.as_str())),
        None => MockProvider::new(),
    };
    if let Some(message) = &args.fail_sign_in {
        provider.fail_next_sign_in(message.as_str());
    }

    let mirror = AuthMirror::new(Arc::new(provider));
    let guard = RouteGuard::new(mirror, routes);

    tracing::info!(
        steps = args.steps.len(),
        readiness = ?args.readiness,
        "Replaying session"
    );

    let reports = replay::replay(&guard, &args.steps, args.readiness)
        .await
        .context("failed to replay session")?;

    println!("{}", format_reports(&reports, format));
    Ok(())
}
