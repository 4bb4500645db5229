// Telemetry sink: one metric point per value, one flush per snapshot.

use crate::models::NodeSnapshot;
use crate::telemetry::TelemetryClient;

/// Metric names and property keys sent upstream.
pub mod metric_names {
    pub const CPU_USAGE: &str = "Cpu usage";
    pub const MEMORY_USED: &str = "Memory used";
    pub const MEMORY_AVAILABLE: &str = "Memory available";
    pub const DISK_USAGE: &str = "Disk usage";
    pub const DISK_FREE: &str = "Disk free";
    pub const DISK_READ: &str = "Disk read";
    pub const DISK_WRITE: &str = "Disk write";
    pub const NETWORK_READ: &str = "Network read";
    pub const NETWORK_WRITE: &str = "Network write";
    pub const PROCESS_CPU: &str = "Process CPU";
    pub const PROCESS_MEMORY: &str = "Process Memory";

    pub const CPU_PROPERTY: &str = "Cpu #";
    pub const DISK_PROPERTY: &str = "Disk";
    pub const PROCESS_NAME_PROPERTY: &str = "Process Name";
    pub const PID_PROPERTY: &str = "PID";
}

use metric_names::*;

pub struct TelemetrySink {
    client: TelemetryClient,
}

impl TelemetrySink {
    pub fn new(client: TelemetryClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TelemetryClient {
        &self.client
    }

    /// Tracks every point of the snapshot, then flushes once. A failed flush is logged only.
    pub async fn upload_stats(&mut self, stats: &NodeSnapshot) {
        tracing::debug!(
            agent_memory = stats.agent_memory.unwrap_or(0),
            mem_avail = stats.mem_avail,
            "Uploading stats"
        );
        self.track_snapshot(stats);

        match self.client.flush().await {
            Ok(points) => {
                tracing::debug!(operation = "telemetry_flush", points, "Stats uploaded");
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = "telemetry_flush",
                    "Failed to upload stats"
                );
            }
        }
    }

    fn track_snapshot(&mut self, stats: &NodeSnapshot) {
        let client = &mut self.client;

        for (cpu_n, percent) in stats.cpu_percent.iter().enumerate() {
            client.track_metric(CPU_USAGE, *percent, &[(CPU_PROPERTY, cpu_n.to_string())]);
        }

        for (label, usage) in &stats.disk_usage {
            client.track_metric(
                DISK_USAGE,
                usage.used as f64,
                &[(DISK_PROPERTY, label.clone())],
            );
            client.track_metric(
                DISK_FREE,
                usage.free as f64,
                &[(DISK_PROPERTY, label.clone())],
            );
        }

        client.track_metric(MEMORY_USED, stats.mem_used() as f64, &[]);
        client.track_metric(MEMORY_AVAILABLE, stats.mem_avail as f64, &[]);
        client.track_metric(DISK_READ, stats.disk_io.read_bps, &[]);
        client.track_metric(DISK_WRITE, stats.disk_io.write_bps, &[]);
        client.track_metric(NETWORK_READ, stats.net.read_bps, &[]);
        client.track_metric(NETWORK_WRITE, stats.net.write_bps, &[]);

        for process in &stats.processes {
            let properties = [
                (PROCESS_NAME_PROPERTY, process.name.clone()),
                (PID_PROPERTY, process.pid.to_string()),
            ];
            client.track_metric(PROCESS_CPU, process.cpu_percent, &properties);
            client.track_metric(PROCESS_MEMORY, process.memory as f64, &properties);
        }
    }
}
