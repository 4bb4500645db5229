// Throughput rate derived from two cumulative counter readings

use serde::{Deserialize, Serialize};

/// Read/write throughput in units per second. Zero before any interval has been observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSample {
    pub read_bps: f64,
    pub write_bps: f64,
}

impl RateSample {
    pub fn new(read_bps: f64, write_bps: f64) -> Self {
        Self {
            read_bps,
            write_bps,
        }
    }
}
