//! Simulated upload progress.
//!
//! Each accepted file gets its own ticker task that adds a random increment
//! on a fixed interval until the file completes or disappears from the queue.
//! The task is owned by a [`TickerHandle`]; cancelling or dropping the handle
//! aborts it.

use std::time::Duration;

use rand::Rng;
use timesheet_core::{FileId, ProgressUpdate, UploadedFile};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::queue::{lock, SharedQueue};

/// Source of per-tick progress increments, in percent.
pub trait ProgressStep: Send {
    fn next_increment(&mut self) -> f64;
}

/// Uniformly random increment in `[0, max)`.
pub struct RandomStep {
    max: f64,
}

impl RandomStep {
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl ProgressStep for RandomStep {
    fn next_increment(&mut self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        rand::rng().random_range(0.0..self.max)
    }
}

/// Same increment on every tick.
pub struct FixedStep(pub f64);

impl ProgressStep for FixedStep {
    fn next_increment(&mut self) -> f64 {
        self.0
    }
}

enum TickOutcome {
    Continue,
    Completed(UploadedFile),
    Stop,
}

/// Handle to a running ticker task.
#[derive(Debug)]
pub struct TickerHandle {
    file_id: FileId,
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn cancel(&self) {
        if !self.task.is_finished() {
            tracing::debug!(file_id = %self.file_id, "Cancelling progress ticker");
        }
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start ticking `file_id` in `queue`.
///
/// The first increment lands one `period` after the call. `on_complete` runs
/// once, with a snapshot of the file, on the tick that takes it to 100%.
/// Must be called from within a Tokio runtime.
pub fn start<F>(
    queue: SharedQueue,
    file_id: FileId,
    period: Duration,
    mut step: Box<dyn ProgressStep>,
    on_complete: F,
) -> TickerHandle
where
    F: FnOnce(&UploadedFile) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;

            let outcome = {
                let mut queue = lock(&queue);
                match queue.advance(file_id, step.next_increment()) {
                    Some(ProgressUpdate::Progressed(progress)) => {
                        tracing::trace!(file_id = %file_id, progress, "Upload progressed");
                        TickOutcome::Continue
                    }
                    Some(ProgressUpdate::Completed) => match queue.get(file_id) {
                        Some(file) => TickOutcome::Completed(file.clone()),
                        None => TickOutcome::Stop,
                    },
                    Some(ProgressUpdate::AlreadyComplete) | None => TickOutcome::Stop,
                }
            };

            match outcome {
                TickOutcome::Continue => continue,
                TickOutcome::Completed(file) => {
                    tracing::info!(file_id = %file_id, name = %file.name, "Upload complete");
                    on_complete(&file);
                    break;
                }
                TickOutcome::Stop => {
                    tracing::debug!(file_id = %file_id, "File no longer tracked, stopping ticker");
                    break;
                }
            }
        }
    });

    TickerHandle { file_id, task }
}
