// Snapshot sampling: raw counters in, one consistent NodeSnapshot out.

use crate::aggregator::RateAggregator;
use crate::error::SampleError;
use crate::models::{DiskUsageStat, NodeSnapshot};
use crate::sysinfo_repo::CounterSource;
use std::collections::BTreeMap;
use std::time::Instant;

/// Builds snapshots from a [`CounterSource`]. Owns the disk and network rate aggregators; holds
/// no other state between calls.
pub struct SnapshotSampler<S> {
    source: S,
    disks: Vec<String>,
    watch_processes: Vec<String>,
    disk: RateAggregator,
    network: RateAggregator,
}

impl<S: CounterSource> SnapshotSampler<S> {
    pub fn new(source: S, disks: Vec<String>, watch_processes: Vec<String>) -> Self {
        Self {
            source,
            disks,
            watch_processes,
            disk: RateAggregator::new(),
            network: RateAggregator::new(),
        }
    }

    /// Samples every counter and assembles a snapshot stamped at `now`.
    ///
    /// Any counter failure or inconsistency abandons the whole sample before either aggregator
    /// moves, so a failed tick leaves the rate baselines untouched. Disk usage is best effort:
    /// an unreadable mount is logged and left out.
    pub fn sample(&mut self, now: Instant) -> Result<NodeSnapshot, SampleError> {
        let cpu_percent = self.source.cpu_percents()?;
        let memory = self.source.memory()?;
        if memory.mem_avail > memory.mem_total {
            return Err(SampleError::inconsistent(
                "memory",
                format!(
                    "available {} exceeds total {}",
                    memory.mem_avail, memory.mem_total
                ),
            ));
        }
        if memory.swap_avail > memory.swap_total {
            return Err(SampleError::inconsistent(
                "swap",
                format!(
                    "available {} exceeds total {}",
                    memory.swap_avail, memory.swap_total
                ),
            ));
        }
        let processes = self.source.processes(&self.watch_processes)?;
        let disk_counters = self.source.disk_io()?;
        let net_counters = self.source.net_io()?;
        let disk_usage = self.sample_disk_usage();
        let agent_memory = self.source.agent_memory();

        let disk_io = self
            .disk
            .aggregate(disk_counters.read, disk_counters.write, now);
        let net = self
            .network
            .aggregate(net_counters.read, net_counters.write, now);

        Ok(NodeSnapshot {
            cpu_count: cpu_percent.len() as u32,
            cpu_percent,
            num_processes: processes.count,
            mem_total: memory.mem_total,
            mem_avail: memory.mem_avail,
            swap_total: memory.swap_total,
            swap_avail: memory.swap_avail,
            disk_io,
            disk_usage,
            net,
            processes: processes.watched,
            agent_memory,
        })
    }

    fn sample_disk_usage(&mut self) -> BTreeMap<String, DiskUsageStat> {
        let mut usage = BTreeMap::new();
        for path in &self.disks {
            match self.source.disk_usage(path) {
                Ok(stat) => {
                    usage.insert(path.clone(), stat);
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        operation = "disk_usage",
                        disk = %path,
                        "disk usage unavailable; omitting mount from snapshot"
                    );
                }
            }
        }
        usage
    }
}
