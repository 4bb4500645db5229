// Collection loop: sample on a fixed cadence, drop the bootstrap tick, dispatch the rest.

use crate::clock::Clock;
use crate::models::NodeSnapshot;
use crate::sampler::SnapshotSampler;
use crate::sink::Sink;
use crate::sysinfo_repo::CounterSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::Instrument;

/// `Bootstrapping` until the first successful sample, `Steady` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Bootstrapping,
    Steady,
}

/// What happened on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// First successful sample; its rates are zero so it is not reported.
    Discarded,
    Dispatched,
    /// Sampling failed; nothing was reported.
    Failed,
}

pub struct CollectionLoop<S> {
    sampler: SnapshotSampler<S>,
    sink: Sink,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    phase: Phase,
}

impl<S: CounterSource> CollectionLoop<S> {
    pub fn new(
        sampler: SnapshotSampler<S>,
        sink: Sink,
        clock: Arc<dyn Clock>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            sampler,
            sink,
            clock,
            refresh_interval,
            phase: Phase::Bootstrapping,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Samples once and routes the snapshot. Never returns an error: failures are logged and the
    /// tick is abandoned.
    pub async fn tick(&mut self) -> TickOutcome {
        let snapshot = match self.sampler.sample(self.clock.now()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, operation = "sample", "Could not sample node stats");
                return TickOutcome::Failed;
            }
        };
        self.route(snapshot).await
    }

    async fn route(&mut self, snapshot: NodeSnapshot) -> TickOutcome {
        match self.phase {
            Phase::Bootstrapping => {
                self.phase = Phase::Steady;
                tracing::debug!(
                    operation = "bootstrap",
                    cpu_count = snapshot.cpu_count,
                    "First sample collected; rate baselines set"
                );
                TickOutcome::Discarded
            }
            Phase::Steady => {
                self.sink.dispatch(&snapshot).await;
                TickOutcome::Dispatched
            }
        }
    }

    /// Ticks forever, sleeping `refresh_interval` after each tick. Returns only when `shutdown`
    /// fires (or its sender is dropped) while the loop is sleeping.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let clock = self.clock.clone();
        let worker_span = tracing::span!(
            tracing::Level::DEBUG,
            "collector",
            refresh_interval_ms = self.refresh_interval.as_millis() as u64
        );

        async move {
            loop {
                self.tick().await;
                tokio::select! {
                    _ = clock.sleep(self.refresh_interval) => {}
                    _ = &mut shutdown => {
                        tracing::debug!("Collector shutting down");
                        break;
                    }
                }
            }
        }
        .instrument(worker_span)
        .await
    }
}
