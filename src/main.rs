use anyhow::Result;
use clap::Parser;
use nodestats::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let cli = config::CliArgs::parse();

    let summary = platform::system_summary();
    tracing::info!(
        version = version::VERSION,
        os = %summary.os,
        os_version = %summary.os_version,
        distribution = %summary.distribution,
        host = %summary.host_name,
        cpu_count = summary.cpu_count,
        "{} starting",
        version::NAME
    );

    let app_config = config::AgentConfig::load(&cli)?;
    app_config.log_summary();

    let sink = sink::Sink::from_config(&app_config)?;
    let sampler = sampler::SnapshotSampler::new(
        sysinfo_repo::SysinfoRepo::new(),
        app_config.disks.clone(),
        app_config.processes.clone(),
    );
    let collector = worker::CollectionLoop::new(
        sampler,
        sink,
        Arc::new(clock::TokioClock),
        app_config.refresh_interval,
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        shutdown::shutdown_signal().await;
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    tracing::debug!(
        pool = %app_config.pool_id,
        node = %app_config.node_id,
        "Start collecting stats"
    );
    collector.run(shutdown_rx).await;
    Ok(())
}
