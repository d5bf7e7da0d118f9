//! Asynchronous, cancellable verification.
//!
//! A session walks a submission through `VERIFICATION_PROGRESS_STEPS` timed
//! steps, publishing percent-complete on a watch channel, then builds the
//! verification record. Cancelling (or dropping the handle) stops the task
//! before any record exists.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use dmeter_core::constants::VERIFICATION_PROGRESS_STEPS;
use dmeter_core::error::DmeterError;
use dmeter_core::source::DataSource;
use dmeter_core::submission::Submission;
use dmeter_core::verification::VerificationRecord;

use crate::builder::VerificationBuilder;

pub const DEFAULT_STEP: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct VerificationSession {
    builder: Arc<VerificationBuilder>,
    step: Duration,
}

impl VerificationSession {
    pub fn new(builder: Arc<VerificationBuilder>) -> Self {
        Self {
            builder,
            step: DEFAULT_STEP,
        }
    }

    /// Interval between progress ticks.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn builder(&self) -> &Arc<VerificationBuilder> {
        &self.builder
    }

    /// Spawn the verification task. Must be called inside a tokio runtime.
    pub fn start(&self, submission: Submission, source: DataSource) -> VerificationHandle {
        let (progress_tx, progress_rx) = watch::channel(0u8);
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let builder = self.builder.clone();
        let step = self.step;

        let task = tokio::spawn(async move {
            let per_step = 100 / VERIFICATION_PROGRESS_STEPS;
            for i in 1..=VERIFICATION_PROGRESS_STEPS {
                tokio::select! {
                    _ = tokio::time::sleep(step) => {
                        let _ = progress_tx.send(i.saturating_mul(per_step).min(100));
                    }
                    _ = &mut cancel_rx => {
                        debug!(source = %source.name, "verification cancelled");
                        return Err(DmeterError::VerificationCancelled);
                    }
                }
            }
            let record = builder.build(&submission, &source);
            let _ = progress_tx.send(100);
            debug!(source = %source.name, proof = %record.proof, "verification complete");
            Ok(record)
        });

        VerificationHandle {
            progress: progress_rx,
            cancel: Some(cancel_tx),
            task,
        }
    }
}

/// Owner of one in-flight verification. Dropping it aborts the task.
pub struct VerificationHandle {
    progress: watch::Receiver<u8>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<VerificationRecord, DmeterError>>,
}

impl VerificationHandle {
    /// Percent complete, 0..=100.
    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    /// A receiver that observes every progress update.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.progress.clone()
    }

    /// Request cancellation. `wait` then yields `VerificationCancelled`
    /// unless the task already finished.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the verification record.
    pub async fn wait(mut self) -> Result<VerificationRecord, DmeterError> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(DmeterError::VerificationCancelled),
            Err(e) => Err(DmeterError::Other(format!("verification task failed: {e}"))),
        }
    }
}

impl Drop for VerificationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
