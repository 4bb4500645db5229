// Node snapshot: one consistent view of CPU, memory, disk and network per tick

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RateSample;

/// Filesystem usage for one watched mount point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsageStat {
    pub used: u64,
    pub free: u64,
    pub total: u64,
    pub percent: f64,
}

impl DiskUsageStat {
    /// Builds usage from total and free space; percent is 0 for an empty filesystem.
    pub fn from_space(total: u64, free: u64) -> Self {
        let used = total.saturating_sub(free);
        let percent = if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Self {
            used,
            free,
            total,
            percent,
        }
    }
}

/// A watched process found in the process table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStat {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    /// Resident memory in bytes.
    pub memory: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub cpu_count: u32,
    /// Per-core utilization, one entry per core (`len() == cpu_count`).
    pub cpu_percent: Vec<f64>,
    pub num_processes: u32,
    pub mem_total: u64,
    pub mem_avail: u64,
    pub swap_total: u64,
    pub swap_avail: u64,
    pub disk_io: RateSample,
    /// Keyed by the watched mount label. Unreadable mounts are absent.
    pub disk_usage: BTreeMap<String, DiskUsageStat>,
    pub net: RateSample,
    #[serde(default)]
    pub processes: Vec<ProcessStat>,
    /// Resident memory of the agent process itself, when known.
    #[serde(default)]
    pub agent_memory: Option<u64>,
}

impl NodeSnapshot {
    pub fn mem_used(&self) -> u64 {
        self.mem_total.saturating_sub(self.mem_avail)
    }

    pub fn swap_used(&self) -> u64 {
        self.swap_total.saturating_sub(self.swap_avail)
    }

    /// Mean utilization across cores; 0 when no cores were reported.
    pub fn cpu_average(&self) -> f64 {
        crate::format::avg(&self.cpu_percent)
    }
}
