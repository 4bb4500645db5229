// Converts cumulative read/write counters into per-second rates.

use crate::models::RateSample;
use std::time::Instant;

/// Tracks the previous counter reading and turns each new reading into a rate.
///
/// The first call only records a baseline and returns a zero rate. Every later call divides the
/// counter delta by the seconds elapsed since the previous call.
///
/// Preconditions: `now` must be strictly later than the previous call's `now`, and counters are
/// expected not to decrease. A counter that resets or wraps yields a negative or meaningless
/// rate; it is reported as-is.
#[derive(Debug, Clone, Default)]
pub struct RateAggregator {
    last_timestamp: Option<Instant>,
    last_read: u64,
    last_write: u64,
}

impl RateAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a baseline has been recorded.
    pub fn is_primed(&self) -> bool {
        self.last_timestamp.is_some()
    }

    pub fn aggregate(&mut self, cur_read: u64, cur_write: u64, now: Instant) -> RateSample {
        let sample = match self.last_timestamp {
            Some(prev) => {
                let delta_seconds = now.duration_since(prev).as_secs_f64();
                RateSample {
                    read_bps: counter_delta(cur_read, self.last_read) / delta_seconds,
                    write_bps: counter_delta(cur_write, self.last_write) / delta_seconds,
                }
            }
            None => RateSample::default(),
        };

        self.last_timestamp = Some(now);
        self.last_read = cur_read;
        self.last_write = cur_write;

        sample
    }
}

// Signed so a counter reset shows up as a negative rate instead of wrapping.
fn counter_delta(current: u64, last: u64) -> f64 {
    current as f64 - last as f64
}
