// Raw readings returned by a counter source, before rate aggregation

use serde::{Deserialize, Serialize};

use super::ProcessStat;

/// Cumulative read/write counters (bytes since boot). Only ever increase until reset or wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoCounters {
    pub read: u64,
    pub write: u64,
}

impl IoCounters {
    pub fn new(read: u64, write: u64) -> Self {
        Self { read, write }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCounters {
    pub mem_total: u64,
    pub mem_avail: u64,
    pub swap_total: u64,
    pub swap_avail: u64,
}

/// Process table summary: total count plus the watched processes that are running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTable {
    pub count: u32,
    pub watched: Vec<ProcessStat>,
}
