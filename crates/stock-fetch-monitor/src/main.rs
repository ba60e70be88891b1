/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Submitted fetch tasks with live progress, service management commands
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stock_fetch_adapter::FetchClient;
use stock_fetch_monitor::MonitorConfig;

use cli::{Cli, Command, commands};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    if let Command::Init { output } = &args.command {
        return cli::init::run_init(output.clone());
    }

    let mut config = MonitorConfig::load(args.config_path.as_deref()).context("load config")?;
    if let Some(server) = args.server {
        config.server_url = server;
    }
    info!(server_url = %config.server_url, "configuration loaded");

    let client = FetchClient::with_config(&config.server_url, config.client_config())
        .context("create fetch client")?;

    match &args.command {
        Command::Query(query) => {
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            commands::run_query(client, &config, query, shutdown).await
        }
        Command::Status => commands::show_status(&client).await,
        Command::Token(token) => commands::run_token(&client, token).await,
        Command::Files(files) => commands::run_files(&client, files).await,
        Command::Init { .. } => Ok(()),
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
