// Shared test helpers: scripted counter source, manual clock, recording transport.

#![allow(dead_code)]

use async_trait::async_trait;
use nodestats::clock::Clock;
use nodestats::error::{SampleError, TelemetryError, UsageError};
use nodestats::models::*;
use nodestats::sysinfo_repo::CounterSource;
use nodestats::telemetry::{Envelope, TelemetryTransport};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Counter source with scripted readings. I/O scripts are consumed one entry per call and the
/// last entry repeats once the script runs out.
pub struct FakeCounters {
    pub cpus: Vec<f64>,
    pub memory: MemoryCounters,
    pub process_count: u32,
    pub watched: Vec<ProcessStat>,
    pub disk_script: VecDeque<IoCounters>,
    pub net_script: VecDeque<IoCounters>,
    pub usage: HashMap<String, DiskUsageStat>,
    /// Zero-based `cpu_percents` calls that fail.
    pub failing_cpu_calls: HashSet<usize>,
    cpu_calls: usize,
    pub agent_memory: Option<u64>,
}

impl Default for FakeCounters {
    fn default() -> Self {
        Self {
            cpus: vec![10.0, 30.0],
            memory: MemoryCounters {
                mem_total: 8_000,
                mem_avail: 3_000,
                swap_total: 2_000,
                swap_avail: 1_500,
            },
            process_count: 42,
            watched: vec![],
            disk_script: VecDeque::new(),
            net_script: VecDeque::new(),
            usage: HashMap::new(),
            failing_cpu_calls: HashSet::new(),
            cpu_calls: 0,
            agent_memory: Some(1_024),
        }
    }
}

impl FakeCounters {
    pub fn with_disk_io(mut self, script: &[(u64, u64)]) -> Self {
        self.disk_script = script.iter().map(|&(r, w)| IoCounters::new(r, w)).collect();
        self
    }

    pub fn with_net_io(mut self, script: &[(u64, u64)]) -> Self {
        self.net_script = script.iter().map(|&(r, w)| IoCounters::new(r, w)).collect();
        self
    }

    pub fn with_usage(mut self, path: &str, total: u64, free: u64) -> Self {
        self.usage
            .insert(path.to_string(), DiskUsageStat::from_space(total, free));
        self
    }

    /// The first `n` calls fail.
    pub fn with_cpu_failures(self, n: usize) -> Self {
        self.with_cpu_failure_on(0..n)
    }

    pub fn with_cpu_failure_on(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_cpu_calls.extend(calls);
        self
    }
}

fn next_reading(script: &mut VecDeque<IoCounters>) -> IoCounters {
    if script.len() > 1 {
        script.pop_front().unwrap_or_default()
    } else {
        script.front().copied().unwrap_or_default()
    }
}

impl CounterSource for FakeCounters {
    fn cpu_percents(&mut self) -> Result<Vec<f64>, SampleError> {
        let call = self.cpu_calls;
        self.cpu_calls += 1;
        if self.failing_cpu_calls.contains(&call) {
            return Err(SampleError::unavailable("cpu", "scripted failure"));
        }
        Ok(self.cpus.clone())
    }

    fn memory(&mut self) -> Result<MemoryCounters, SampleError> {
        Ok(self.memory)
    }

    fn processes(&mut self, watch: &[String]) -> Result<ProcessTable, SampleError> {
        Ok(ProcessTable {
            count: self.process_count,
            watched: self
                .watched
                .iter()
                .filter(|p| watch.contains(&p.name))
                .cloned()
                .collect(),
        })
    }

    fn disk_io(&mut self) -> Result<IoCounters, SampleError> {
        Ok(next_reading(&mut self.disk_script))
    }

    fn net_io(&mut self) -> Result<IoCounters, SampleError> {
        Ok(next_reading(&mut self.net_script))
    }

    fn disk_usage(&mut self, path: &str) -> Result<DiskUsageStat, UsageError> {
        self.usage
            .get(path)
            .copied()
            .ok_or_else(|| UsageError::NoFilesystem(path.to_string()))
    }

    fn agent_memory(&mut self) -> Option<u64> {
        self.agent_memory
    }
}

/// Clock that advances only when slept on. Records every sleep. After `stop_after` sleeps it
/// fires the shutdown sender and parks the sleep so the loop exits through shutdown.
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
    stop_after: usize,
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::stopping_after(usize::MAX, None)
    }

    pub fn stopping_after(stop_after: usize, stop_tx: Option<oneshot::Sender<()>>) -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
            stop_after,
            stop_tx: Mutex::new(stop_tx),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock().unwrap() += by;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            sleeps.len()
        };
        if count >= self.stop_after {
            if let Some(tx) = self.stop_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
            std::future::pending::<()>().await;
        }
        self.advance(duration);
    }
}

/// Transport that keeps every flushed batch. Fails when `fail` is set.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub batches: Arc<Mutex<Vec<Vec<Envelope>>>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<Envelope>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelemetryTransport for RecordingTransport {
    async fn send(&self, batch: &[Envelope]) -> Result<(), TelemetryError> {
        self.batches.lock().unwrap().push(batch.to_vec());
        if self.fail {
            return Err(TelemetryError::Transport("scripted failure".into()));
        }
        Ok(())
    }
}

pub fn test_config() -> nodestats::config::AgentConfig {
    nodestats::config::AgentConfig {
        pool_id: "pool-1".into(),
        node_id: "node-1".into(),
        instrumentation_key: Some("key".into()),
        processes: vec![],
        disks: vec!["/".into()],
        refresh_interval: Duration::from_secs(5),
        telemetry_endpoint: nodestats::telemetry::DEFAULT_ENDPOINT.into(),
    }
}

pub fn minimal_snapshot() -> NodeSnapshot {
    NodeSnapshot {
        cpu_count: 2,
        cpu_percent: vec![10.0, 30.0],
        num_processes: 42,
        mem_total: 8_000,
        mem_avail: 3_000,
        swap_total: 2_000,
        swap_avail: 1_500,
        disk_io: RateSample::new(1_000.0, 500.0),
        disk_usage: BTreeMap::from([(
            "/".to_string(),
            DiskUsageStat::from_space(10_000, 7_500),
        )]),
        net: RateSample::new(2_000.0, 250.0),
        processes: vec![],
        agent_memory: None,
    }
}
