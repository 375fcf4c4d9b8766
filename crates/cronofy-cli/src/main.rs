//! cronofy CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::debug;

use cronofy_api::CallContext;
use cronofy_cli::cli::{Cli, Command, ConfigAction};
use cronofy_cli::commands;
use cronofy_cli::config::CliConfig;
use cronofy_cli::error::{ClientError, ClientResult};
use cronofy_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::reporter()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let mut config = match cli.config {
        Some(ref path) => CliConfig::load_from(path),
        None => CliConfig::load(),
    }
    .map_err(ClientError::Config)?;
    config.apply_cli(&cli);

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
        Some(Command::Calendars) => {
            let ctx = call_context(&config);
            commands::calendars::run(&config, &ctx).await
        }
        Some(Command::Events) | None => {
            let ctx = call_context(&config);
            commands::events::run(&config, &ctx).await
        }
    }
}

/// Builds the context for API calls: Ctrl+C cancels, `timeout` bounds.
fn call_context(config: &CliConfig) -> CallContext {
    let mut ctx = CallContext::background().with_cancellation(spawn_interrupt_listener());
    if let Some(secs) = config.api.timeout {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }
    ctx
}

fn spawn_interrupt_listener() -> watch::Receiver<bool> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("received interrupt, cancelling");
            let _ = cancel_tx.send(true);
        }
    });
    cancel_rx
}
