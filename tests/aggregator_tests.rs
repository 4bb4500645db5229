// Rate aggregation: bootstrap, steady-state rates, counter reset

use nodestats::aggregator::RateAggregator;
use nodestats::models::RateSample;
use std::time::{Duration, Instant};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}

#[test]
fn first_aggregate_returns_zero_regardless_of_counters() {
    let mut agg = RateAggregator::new();
    assert!(!agg.is_primed());
    let out = agg.aggregate(123_456_789, 987_654_321, Instant::now());
    assert_eq!(out, RateSample::default());
    assert!(agg.is_primed());
}

#[test]
fn second_aggregate_divides_delta_by_elapsed_seconds() {
    let t0 = Instant::now();
    let mut agg = RateAggregator::new();
    agg.aggregate(1000, 2000, t0);
    let out = agg.aggregate(2000, 2500, t0 + Duration::from_secs(1));
    assert!(approx_eq(out.read_bps, 1000.0));
    assert!(approx_eq(out.write_bps, 500.0));
}

#[test]
fn each_call_rebases_on_previous_sample() {
    let t0 = Instant::now();
    let mut agg = RateAggregator::new();
    agg.aggregate(0, 0, t0);
    let readings = [
        (500, 100, Duration::from_millis(500)),
        (2_500, 100, Duration::from_secs(2)),
        (2_500, 4_100, Duration::from_secs(4)),
    ];
    let mut last = (0u64, 0u64, t0);
    for (read, write, after) in readings {
        let now = last.2 + after;
        let out = agg.aggregate(read, write, now);
        let secs = after.as_secs_f64();
        assert!(approx_eq(out.read_bps, (read - last.0) as f64 / secs));
        assert!(approx_eq(out.write_bps, (write - last.1) as f64 / secs));
        last = (read, write, now);
    }
}

#[test]
fn unchanged_counters_give_zero_rate() {
    let t0 = Instant::now();
    let mut agg = RateAggregator::new();
    agg.aggregate(10, 10, t0);
    let out = agg.aggregate(10, 10, t0 + Duration::from_secs(5));
    assert_eq!(out, RateSample::new(0.0, 0.0));
}

#[test]
fn counter_reset_reports_negative_rate() {
    let t0 = Instant::now();
    let mut agg = RateAggregator::new();
    agg.aggregate(10_000, 10_000, t0);
    let out = agg.aggregate(0, 20_000, t0 + Duration::from_secs(2));
    assert!(approx_eq(out.read_bps, -5_000.0));
    assert!(approx_eq(out.write_bps, 5_000.0));
}
