// Domain models: rates, counters and the per-tick node snapshot

mod counters;
mod rate;
mod snapshot;

pub use counters::{IoCounters, MemoryCounters, ProcessTable};
pub use rate::RateSample;
pub use snapshot::{DiskUsageStat, NodeSnapshot, ProcessStat};
