/*
[INPUT]:  Parsed CLI commands, FetchClient, MonitorConfig, shutdown token
[OUTPUT]: Task submission with live progress, status, token and file management
[POS]:    CLI layer - command execution
[UPDATE]: When subcommand behavior changes
*/

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;

use stock_fetch_adapter::FetchClient;
use stock_fetch_monitor::{MonitorConfig, TaskCoordinator, TaskState, TerminalSink, WsTransport};

use super::{FilesCommand, QueryArgs, TokenCommand};

/// Submit a task and render its progress until it ends or shutdown fires
pub async fn run_query(
    client: FetchClient,
    config: &MonitorConfig,
    args: &QueryArgs,
    shutdown: CancellationToken,
) -> Result<()> {
    let params = args.to_params(config.default_years)?;
    let transport = WsTransport::new(client.clone());
    let sink = TerminalSink::stdout(config.locale);
    let mut coordinator = TaskCoordinator::new(client.clone(), transport, sink);

    let task_id = coordinator.submit(&params).await?;
    println!("{} {}", style("Task accepted:").bold(), task_id);

    let cancelled = tokio::select! {
        _ = coordinator.run() => false,
        _ = shutdown.cancelled() => true,
    };
    if cancelled {
        info!(task_id = %task_id, "shutdown requested; abandoning task");
        coordinator.abandon();
    }

    if coordinator.sink().files_stale() {
        list_files(&client).await?;
    }

    match coordinator.state() {
        TaskState::Completed => Ok(()),
        state => bail!("task {task_id} ended in state {}", state.label(config.locale)),
    }
}

pub async fn show_status(client: &FetchClient) -> Result<()> {
    let status = client.task_status().await.context("query task status")?;
    println!("{} {}", style("State:").bold(), status.state.as_str());
    if let Some(task_id) = &status.task_id {
        println!("{} {}", style("Task:").bold(), task_id);
    }
    if status.total > 0 {
        println!("{} {}/{}", style("Progress:").bold(), status.progress, status.total);
    }
    if !status.message.is_empty() {
        println!("{} {}", style("Message:").bold(), status.message);
    }
    for file in &status.files {
        println!("  {}", style(file).cyan());
    }
    Ok(())
}

pub async fn run_token(client: &FetchClient, command: &TokenCommand) -> Result<()> {
    match command {
        TokenCommand::Show => {
            let status = client.token_status().await.context("query token status")?;
            if status.configured {
                println!("{} {}", style("Token configured:").green(), status.masked);
            } else {
                println!("{}", style("No token configured").yellow());
            }
        }
        TokenCommand::Set { token } => {
            let saved = client.set_token(token).await?;
            println!("{} {}", style("Token saved:").green(), saved.masked);
        }
    }
    Ok(())
}

pub async fn run_files(client: &FetchClient, command: &FilesCommand) -> Result<()> {
    match command {
        FilesCommand::List => list_files(client).await,
        FilesCommand::Delete { path, yes } => {
            let confirmed = *yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Delete {path}?"))
                    .default(false)
                    .interact()?;
            if !confirmed {
                println!("{}", style("Cancelled").dim());
                return Ok(());
            }
            client.delete_file(path).await?;
            println!("{} {}", style("Deleted").green(), path);
            Ok(())
        }
        FilesCommand::Download { path, output } => download(client, path, output).await,
    }
}

async fn list_files(client: &FetchClient) -> Result<()> {
    let files = client.list_files().await.context("list files")?;
    if files.is_empty() {
        println!("{}", style("No files").dim());
        return Ok(());
    }
    for file in files {
        println!(
            "{:<40} {:>12}  {}",
            file.name,
            file.size_kib(),
            style(&file.path).dim()
        );
    }
    Ok(())
}

async fn download(client: &FetchClient, path: &str, output: &Path) -> Result<()> {
    let bytes = client.download_file(path).await?;
    let name = Path::new(path)
        .file_name()
        .context("download path has no file name")?;
    let target = output.join(name);
    tokio::fs::create_dir_all(output)
        .await
        .with_context(|| format!("create {}", output.display()))?;
    tokio::fs::write(&target, &bytes)
        .await
        .with_context(|| format!("write {}", target.display()))?;
    println!(
        "{} {} ({} bytes)",
        style("Saved").green(),
        target.display(),
        bytes.len()
    );
    Ok(())
}
