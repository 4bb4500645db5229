// Log sink: fixed-format stats block, one INFO record per tick.

use crate::format::{pretty_nb, pretty_nb_with_suffix};
use crate::models::NodeSnapshot;
use std::fmt::Write;
use tracing::Span;

const BANNER: &str = "========================= Stats =========================";
const SEPARATOR: &str = "-------------------------------------";

pub struct LogSink {
    span: Span,
}

impl LogSink {
    /// Log sink whose records carry the pool and node ids.
    pub fn new(pool_id: &str, node_id: &str) -> Self {
        Self::with_span(tracing::info_span!("stats", pool = %pool_id, node = %node_id))
    }

    pub fn with_span(span: Span) -> Self {
        Self { span }
    }

    pub fn log_stats(&self, snapshot: &NodeSnapshot) {
        let _guard = self.span.enter();
        tracing::info!("\n{}", render_stats(snapshot));
    }
}

/// Renders the stats block for one snapshot.
pub fn render_stats(stats: &NodeSnapshot) -> String {
    let per_core: Vec<String> = stats.cpu_percent.iter().map(|p| format!("{p:.1}")).collect();
    let mut out = String::new();
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(
        out,
        "Cpu percent:            {}% [{}]",
        stats.cpu_average() as i64,
        per_core.join(", ")
    );
    let _ = writeln!(
        out,
        "Memory used:       {} / {}",
        pretty_nb_with_suffix(stats.mem_used() as f64, "B"),
        pretty_nb_with_suffix(stats.mem_total as f64, "B")
    );
    let _ = writeln!(
        out,
        "Swap used:         {} / {}",
        pretty_nb_with_suffix(stats.swap_used() as f64, "B"),
        pretty_nb_with_suffix(stats.swap_total as f64, "B")
    );
    let _ = writeln!(
        out,
        "Net read:               {}",
        pretty_nb_with_suffix(stats.net.read_bps, "Bs")
    );
    let _ = writeln!(
        out,
        "Net write:              {}",
        pretty_nb_with_suffix(stats.net.write_bps, "Bs")
    );
    let _ = writeln!(
        out,
        "Disk read:              {}",
        pretty_nb_with_suffix(stats.disk_io.read_bps, "Bs")
    );
    let _ = writeln!(
        out,
        "Disk write:             {}",
        pretty_nb_with_suffix(stats.disk_io.write_bps, "Bs")
    );
    let _ = writeln!(out, "Disk usage:");
    for (label, usage) in &stats.disk_usage {
        let _ = writeln!(
            out,
            "  - {}: {}/{} ({:.1}%)",
            label,
            pretty_nb_with_suffix(usage.used as f64, "B"),
            pretty_nb_with_suffix(usage.total as f64, "B"),
            usage.percent
        );
    }
    if !stats.processes.is_empty() {
        let _ = writeln!(out, "Processes:");
        for p in &stats.processes {
            let _ = writeln!(
                out,
                "  - {} ({}): cpu {:.1}%, mem {}B",
                p.name,
                p.pid,
                p.cpu_percent,
                pretty_nb(p.memory as f64)
            );
        }
    }
    out.push_str(SEPARATOR);
    out
}
