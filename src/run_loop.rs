//! Generate-and-publish loop.
//!
//! ```text
//!          run()
//!   Idle ─────────► Running ──── count posts sent ────► Exhausted ──┐
//!                      │                                            ├─► flush
//!                      └──────── token cancelled ─────► Stopped ────┘
//! ```
//!
//! Bounded mode sends back to back. Continuous mode sleeps a random delay
//! after every send and only ends when the cancellation token fires.

use post_generator::PostGenerator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use social_post_kafka::{DeliverySummary, PostSink, PublishError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// How many posts a run sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Send exactly `count` posts without pausing.
    Bounded { count: u64 },
    /// Send until cancelled, pausing between posts.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    /// Cancelled before the run finished on its own.
    Stopped,
    /// Every requested post was submitted.
    Exhausted,
}

/// Source of the pause between two continuous-mode sends.
pub trait DelayPolicy: Send {
    fn next_delay(&mut self) -> Duration;
}

#[derive(Debug, thiserror::Error)]
pub enum DelayError {
    #[error("minimum delay {min:?} exceeds maximum delay {max:?}")]
    InvalidBounds { min: Duration, max: Duration },
}

/// Delays drawn uniformly from `[min, max]`.
#[derive(Debug)]
pub struct UniformDelay {
    min: Duration,
    max: Duration,
    rng: StdRng,
}

impl UniformDelay {
    pub const DEFAULT_MIN: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX: Duration = Duration::from_secs(30);

    /// Create a delay source; a `seed` makes the sequence reproducible.
    pub fn new(min: Duration, max: Duration, seed: Option<u64>) -> Result<Self, DelayError> {
        if min > max {
            return Err(DelayError::InvalidBounds { min, max });
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { min, max, rng })
    }
}

impl DelayPolicy for UniformDelay {
    fn next_delay(&mut self) -> Duration {
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub state: RunState,
    /// Posts handed to the sink.
    pub submitted: u64,
    /// Posts the sink refused before they left the process.
    pub rejected: u64,
    /// Broker acknowledgements collected by the final flush.
    pub delivery: DeliverySummary,
}

#[derive(Debug, Default)]
struct Progress {
    submitted: u64,
    rejected: u64,
}

/// Drives the generator and the sink for one topic.
///
/// The loop owns its sink; there is no process-wide client.
pub struct RunLoop<S, D> {
    topic: String,
    generator: PostGenerator,
    sink: S,
    delay: D,
    state: RunState,
}

impl<S: PostSink, D: DelayPolicy> RunLoop<S, D> {
    pub fn new(topic: impl Into<String>, generator: PostGenerator, sink: S, delay: D) -> Self {
        Self {
            topic: topic.into(),
            generator,
            sink,
            delay,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run to completion or cancellation, then flush the sink exactly once.
    ///
    /// Per-post send errors are logged and counted, never returned. The only
    /// error surfaced here is a failed flush.
    pub async fn run(
        &mut self,
        mode: RunMode,
        cancel: &CancellationToken,
    ) -> Result<RunReport, PublishError> {
        self.transition(RunState::Running);

        let mut progress = Progress::default();
        let end_state = match mode {
            RunMode::Bounded { count } => self.run_bounded(count, cancel, &mut progress).await,
            RunMode::Continuous => self.run_continuous(cancel, &mut progress).await,
        };
        self.transition(end_state);

        let delivery = self.sink.flush().await?;

        Ok(RunReport {
            state: end_state,
            submitted: progress.submitted,
            rejected: progress.rejected,
            delivery,
        })
    }

    async fn run_bounded(
        &mut self,
        count: u64,
        cancel: &CancellationToken,
        progress: &mut Progress,
    ) -> RunState {
        for sent in 0..count {
            if cancel.is_cancelled() {
                info!("Interrupted after {sent} of {count} posts");
                return RunState::Stopped;
            }
            self.send_one(progress).await;
        }
        RunState::Exhausted
    }

    async fn run_continuous(
        &mut self,
        cancel: &CancellationToken,
        progress: &mut Progress,
    ) -> RunState {
        while !cancel.is_cancelled() {
            self.send_one(progress).await;

            let delay = self.delay.next_delay();
            debug!("Next post in {delay:?}");

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Stopping continuous message sending.");
        RunState::Stopped
    }

    async fn send_one(&mut self, progress: &mut Progress) {
        let post = self.generator.generate();
        match self.sink.send(&self.topic, &post).await {
            Ok(()) => progress.submitted += 1,
            Err(err) => {
                progress.rejected += 1;
                error!("Error encountered: {err}");
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        debug!("Run loop {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<S, D> std::fmt::Debug for RunLoop<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLoop")
            .field("topic", &self.topic)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
