use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use latency_report::config::{default_config_path, AppConfig};
use latency_report::report::{parse_interval, render_table, since_timestamp};
use latency_report::telemetry::{init_telemetry, level_for};
use latency_report::version::BUILD_INFO;
use latency_report::{OpenSearchClient, ReportOrchestrator};

#[derive(Parser)]
#[command(
    name = "latency-report",
    about = "Upstream latency per request path from nginx access logs"
)]
struct Cli {
    /// Relative interval to look back over (e.g. 5m, 1h, 1h30m)
    #[arg(default_value = "5m")]
    interval: String,

    /// Path to config file (default: ~/opensearch_config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print build version details and exit
    #[arg(short = 'v', long)]
    version: bool,

    /// Also report the backend-reported search time
    #[arg(long)]
    took: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "debug")]
    quiet: bool,

    /// Log per-page progress
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        print!("{}", BUILD_INFO);
        return Ok(());
    }

    init_telemetry(level_for(cli.quiet, cli.debug))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    // Load configuration
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = AppConfig::load(&config_path).context("cannot initialize config")?;
    config.validate().context("cannot initialize config")?;

    tracing::debug!("Configuration '{}' loaded", config_path.display());

    let interval = parse_interval(&cli.interval)?;

    let client = OpenSearchClient::new(&config.search).context("cannot initialize")?;
    let orchestrator = ReportOrchestrator::new(Arc::new(client));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let start = Instant::now();
    let since = since_timestamp(chrono::Utc::now(), interval)?;
    tracing::debug!("Searching from {}", since);

    let report = orchestrator.run(&since, &cancel).await?;
    let elapsed = start.elapsed();

    tracing::info!("Total time taken: {:?}", elapsed);
    if cli.took {
        tracing::info!(pages = report.pages, "Search took: {} ms", report.took_ms);
    }

    print!("{}", render_table(&report.stats));

    if let Some(e) = report.interrupted {
        anyhow::bail!(
            "report is partial: pagination stopped after {} page(s): {}",
            report.pages,
            e
        );
    }

    Ok(())
}

async fn cancel_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received, cancelling report...");
    cancel.cancel();
}
