// Snapshot sinks: remote telemetry or the local log. Chosen once at startup.

mod log;
mod telemetry;

use crate::config::AgentConfig;
use crate::models::NodeSnapshot;
use crate::telemetry::{HttpTransport, TelemetryClient, TelemetryContext, TelemetryTransport};

pub use log::{LogSink, render_stats};
pub use telemetry::{TelemetrySink, metric_names};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Telemetry,
    Log,
}

impl SinkKind {
    /// Telemetry when an instrumentation key is configured, otherwise the log.
    pub fn resolve(instrumentation_key: Option<&str>) -> Self {
        match instrumentation_key {
            Some(key) if !key.trim().is_empty() => SinkKind::Telemetry,
            _ => SinkKind::Log,
        }
    }
}

pub enum Sink {
    Telemetry(TelemetrySink),
    Log(LogSink),
}

impl Sink {
    /// Builds the sink for this process: HTTP telemetry when a key is set, else the log sink.
    pub fn from_config(config: &AgentConfig) -> anyhow::Result<Self> {
        let key = config
            .instrumentation_key
            .as_deref()
            .filter(|_| config.sink_kind() == SinkKind::Telemetry);
        match key {
            Some(key) => {
                let transport = HttpTransport::new(&config.telemetry_endpoint)?;
                tracing::info!(
                    endpoint = %transport.endpoint(),
                    "Uploading stats to telemetry"
                );
                Ok(Self::telemetry(config, key, Box::new(transport)))
            }
            None => {
                tracing::info!(
                    "No instrumentation key set (APP_INSIGHTS_INSTRUMENTATION_KEY / APP_INSIGHTS_KEY); stats go to the log"
                );
                Ok(Sink::Log(LogSink::new(&config.pool_id, &config.node_id)))
            }
        }
    }

    /// Telemetry sink over an explicit transport.
    pub fn telemetry(
        config: &AgentConfig,
        key: &str,
        transport: Box<dyn TelemetryTransport>,
    ) -> Self {
        let context = TelemetryContext::new(key, &config.pool_id, &config.node_id);
        Sink::Telemetry(TelemetrySink::new(TelemetryClient::new(context, transport)))
    }

    pub fn kind(&self) -> SinkKind {
        match self {
            Sink::Telemetry(_) => SinkKind::Telemetry,
            Sink::Log(_) => SinkKind::Log,
        }
    }

    /// Delivers one snapshot. Delivery failures are logged here and never propagate.
    pub async fn dispatch(&mut self, snapshot: &NodeSnapshot) {
        match self {
            Sink::Telemetry(sink) => sink.upload_stats(snapshot).await,
            Sink::Log(sink) => sink.log_stats(snapshot),
        }
    }
}
