//! CLI entry point for the xhs downloader.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use xhs_core::{Settings, SystemClipboard, Xhs};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let work_path = args.work_path.unwrap_or_else(|| PathBuf::from("."));
    let settings = Settings::load_or_default(&work_path);
    let app = Xhs::open(settings).await?;

    match args.command {
        Command::Extract { text, download } => {
            let input = if text.is_empty() {
                read_stdin()?
            } else {
                text.join("\n")
            };
            let records = app.extract(&input, download).await;
            let processed = records.iter().filter(|r| !r.is_empty()).count();
            info!(
                total = records.len(),
                processed,
                failed = records.len() - processed,
                "extraction finished"
            );
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Monitor { delay_ms, download } => {
            let delay = delay_ms.unwrap_or(app.settings().monitor_delay_ms);
            let mut clipboard = SystemClipboard::new()?;

            let app = Arc::new(app);
            let signal_app = Arc::clone(&app);
            let signal_task = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received; draining queued links");
                    signal_app.stop_monitor();
                }
            });

            app.monitor(&mut clipboard, Duration::from_millis(delay), download)
                .await;
            signal_task.abort();

            if let Ok(app) = Arc::try_unwrap(app) {
                app.close().await;
            }
            return Ok(());
        }
        Command::Check { work_id } => {
            let downloaded = app.skip_download(&work_id).await?;
            println!("{downloaded}");
        }
    }

    app.close().await;
    Ok(())
}

/// Reads piped stdin; an interactive terminal yields an empty string.
fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        info!("no input provided; pass link text as arguments or pipe it via stdin");
        return Ok(String::new());
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
