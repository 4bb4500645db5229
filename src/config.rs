// Agent configuration: defaults < config file < environment < command line.

use crate::format::hide_secret;
use crate::sink::SinkKind;
use crate::telemetry::DEFAULT_ENDPOINT;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Time between the end of one tick and the start of the next.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_POOL_ID: &str = "_test-pool-1";
pub const DEFAULT_NODE_ID: &str = "_test-node-1";

pub const ENV_POOL_ID: &str = "AZ_BATCH_POOL_ID";
pub const ENV_NODE_ID: &str = "AZ_BATCH_NODE_ID";
/// Instrumentation key variables, in lookup order.
pub const ENV_INSTRUMENTATION_KEYS: [&str; 2] =
    ["APP_INSIGHTS_INSTRUMENTATION_KEY", "APP_INSIGHTS_KEY"];
pub const ENV_MONITOR_PROCESSES: &str = "AZ_BATCH_MONITOR_PROCESSES";

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "nodestats",
    version,
    about = "Samples node stats and reports them to telemetry or the log"
)]
pub struct CliArgs {
    /// Pool id
    pub pool_id: Option<String>,

    /// Node id
    pub node_id: Option<String>,

    /// Telemetry instrumentation key
    pub instrumentation_key: Option<String>,

    /// Optional TOML config file
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated process names to watch
    #[arg(long, value_delimiter = ',')]
    pub process: Vec<String>,
}

/// Config file contents. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub pool_id: Option<String>,
    pub node_id: Option<String>,
    pub instrumentation_key: Option<String>,
    pub processes: Option<Vec<String>>,
    pub disks: Option<Vec<String>>,
    pub refresh_interval_secs: Option<u64>,
    pub telemetry_endpoint: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("config file {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Resolved configuration, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub pool_id: String,
    pub node_id: String,
    pub instrumentation_key: Option<String>,
    pub processes: Vec<String>,
    pub disks: Vec<String>,
    pub refresh_interval: Duration,
    pub telemetry_endpoint: String,
}

impl AgentConfig {
    /// Resolves config from the process environment, the optional config file and `cli`.
    pub fn load(cli: &CliArgs) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file, |key| std::env::var(key).ok())
    }

    /// Merges the layers. `env` looks up an environment variable; empty values never override.
    pub fn resolve(
        cli: &CliArgs,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let env = |key: &str| non_empty(env(key));

        let pool_id = non_empty(cli.pool_id.clone())
            .or_else(|| env(ENV_POOL_ID))
            .or_else(|| non_empty(file.pool_id))
            .unwrap_or_else(|| DEFAULT_POOL_ID.to_string());
        let node_id = non_empty(cli.node_id.clone())
            .or_else(|| env(ENV_NODE_ID))
            .or_else(|| non_empty(file.node_id))
            .unwrap_or_else(|| DEFAULT_NODE_ID.to_string());
        let instrumentation_key = non_empty(cli.instrumentation_key.clone())
            .or_else(|| ENV_INSTRUMENTATION_KEYS.iter().find_map(|k| env(*k)))
            .or_else(|| non_empty(file.instrumentation_key));

        let processes = Some(clean_list(cli.process.iter().cloned()))
            .filter(|p| !p.is_empty())
            .or_else(|| {
                env(ENV_MONITOR_PROCESSES)
                    .map(|v| clean_list(v.split(',').map(str::to_string)))
                    .filter(|p| !p.is_empty())
            })
            .or_else(|| file.processes.map(clean_list))
            .unwrap_or_default();

        let disks = match file.disks {
            Some(disks) => clean_list(disks),
            None => crate::platform::default_disks(),
        };

        let refresh_interval = file
            .refresh_interval_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL);
        let telemetry_endpoint = non_empty(file.telemetry_endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let config = Self {
            pool_id,
            node_id,
            instrumentation_key,
            processes,
            disks,
            refresh_interval,
            telemetry_endpoint,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.pool_id.trim().is_empty(), "pool_id must be non-empty");
        anyhow::ensure!(!self.node_id.trim().is_empty(), "node_id must be non-empty");
        anyhow::ensure!(
            !self.refresh_interval.is_zero(),
            "refresh_interval_secs must be > 0, got {}",
            self.refresh_interval.as_secs()
        );
        anyhow::ensure!(
            self.telemetry_endpoint.starts_with("http://")
                || self.telemetry_endpoint.starts_with("https://"),
            "telemetry_endpoint must be an http(s) URL, got {}",
            self.telemetry_endpoint
        );
        Ok(())
    }

    pub fn sink_kind(&self) -> SinkKind {
        SinkKind::resolve(self.instrumentation_key.as_deref())
    }

    /// Logs the resolved config with the instrumentation key hidden.
    pub fn log_summary(&self) {
        tracing::info!(
            pool_id = %self.pool_id,
            node_id = %self.node_id,
            instrumentation_key = hide_secret(self.instrumentation_key.as_deref()),
            refresh_interval_secs = self.refresh_interval.as_secs(),
            disks = ?self.disks,
            processes = ?self.processes,
            "Node stats configuration"
        );
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: impl IntoIterator<Item = String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
