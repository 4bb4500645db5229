// OS counters via sysinfo

mod mounts;

use crate::error::{SampleError, UsageError};
use crate::models::{DiskUsageStat, IoCounters, MemoryCounters, ProcessStat, ProcessTable};
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};
use tracing::instrument;

pub use mounts::mount_for_path;

/// Source of raw OS counters for one snapshot. Each call reads the current value; cumulative
/// counters are returned as-is and turned into rates by the sampler.
pub trait CounterSource {
    /// Per-core CPU utilization in percent.
    fn cpu_percents(&mut self) -> Result<Vec<f64>, SampleError>;

    fn memory(&mut self) -> Result<MemoryCounters, SampleError>;

    /// Process count plus every running process whose name is in `watch`.
    fn processes(&mut self, watch: &[String]) -> Result<ProcessTable, SampleError>;

    /// Cumulative bytes read/written, summed over all disks.
    fn disk_io(&mut self) -> Result<IoCounters, SampleError>;

    /// Cumulative bytes received (read) and sent (write), summed over all interfaces.
    fn net_io(&mut self) -> Result<IoCounters, SampleError>;

    /// Usage of the filesystem that holds `path`. Called after `disk_io` within a tick, so the
    /// disk list it reads is already refreshed.
    fn disk_usage(&mut self, path: &str) -> Result<DiskUsageStat, UsageError>;

    /// Resident memory of the current process.
    fn agent_memory(&mut self) -> Option<u64>;
}

pub struct SysinfoRepo {
    sys: System,
    disks: Disks,
    networks: Networks,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    /// Loads disk and interface lists and primes CPU usage so the next reading has a baseline.
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys,
            disks,
            networks,
        }
    }
}

impl CounterSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu_percents"))]
    fn cpu_percents(&mut self) -> Result<Vec<f64>, SampleError> {
        self.sys.refresh_cpu_usage();
        let percents: Vec<f64> = self
            .sys
            .cpus()
            .iter()
            .map(|c| c.cpu_usage() as f64)
            .collect();
        if percents.is_empty() {
            return Err(SampleError::unavailable("cpu", "no cpus reported"));
        }
        Ok(percents)
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "memory"))]
    fn memory(&mut self) -> Result<MemoryCounters, SampleError> {
        self.sys.refresh_memory();
        Ok(MemoryCounters {
            mem_total: self.sys.total_memory(),
            mem_avail: self.sys.available_memory(),
            swap_total: self.sys.total_swap(),
            swap_avail: self.sys.free_swap(),
        })
    }

    #[instrument(skip(self, watch), fields(repo = "sysinfo", operation = "processes"))]
    fn processes(&mut self, watch: &[String]) -> Result<ProcessTable, SampleError> {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        // Linux tasks include threads, which share the owning process name and memory.
        let processes: Vec<_> = self
            .sys
            .processes()
            .iter()
            .filter(|(_, p)| p.thread_kind().is_none())
            .collect();
        let count = processes.len().min(u32::MAX as usize) as u32;
        let mut watched: Vec<ProcessStat> = if watch.is_empty() {
            Vec::new()
        } else {
            processes
                .into_iter()
                .filter_map(|(pid, p)| {
                    let name = p.name().to_string_lossy().into_owned();
                    watch.contains(&name).then(|| ProcessStat {
                        pid: pid.as_u32(),
                        name,
                        cpu_percent: p.cpu_usage() as f64,
                        memory: p.memory(),
                    })
                })
                .collect()
        };
        watched.sort_by_key(|p| p.pid);
        Ok(ProcessTable { count, watched })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "disk_io"))]
    fn disk_io(&mut self) -> Result<IoCounters, SampleError> {
        self.disks.refresh(true);
        let totals = self
            .disks
            .list()
            .iter()
            .map(|d| d.usage())
            .fold(IoCounters::default(), |acc, u| IoCounters {
                read: acc.read.saturating_add(u.total_read_bytes),
                write: acc.write.saturating_add(u.total_written_bytes),
            });
        Ok(totals)
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "net_io"))]
    fn net_io(&mut self) -> Result<IoCounters, SampleError> {
        self.networks.refresh(true);
        let totals = self
            .networks
            .list()
            .values()
            .fold(IoCounters::default(), |acc, data| IoCounters {
                read: acc.read.saturating_add(data.total_received()),
                write: acc.write.saturating_add(data.total_transmitted()),
            });
        Ok(totals)
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "disk_usage"))]
    fn disk_usage(&mut self, path: &str) -> Result<DiskUsageStat, UsageError> {
        std::fs::metadata(path).map_err(|source| UsageError::Inaccessible {
            path: path.to_string(),
            source,
        })?;
        let mounts: Vec<_> = self
            .disks
            .list()
            .iter()
            .map(|d| d.mount_point())
            .collect();
        let index = mount_for_path(std::path::Path::new(path), &mounts)
            .ok_or_else(|| UsageError::NoFilesystem(path.to_string()))?;
        let disk = &self.disks.list()[index];
        Ok(DiskUsageStat::from_space(
            disk.total_space(),
            disk.available_space(),
        ))
    }

    fn agent_memory(&mut self) -> Option<u64> {
        let pid = sysinfo::get_current_pid().ok()?;
        self.sys.process(pid).map(|p| p.memory())
    }
}
