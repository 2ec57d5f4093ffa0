//! Task polling
//!
//! Drives a dispatched task from "submitted" to either a result-file
//! identifier or a timeout, querying status at a fixed interval.

use async_trait::async_trait;
use dnac_core::{DnacError, PollPolicy, Result, Task};
use tracing::{debug, info};

/// Source of task status snapshots
///
/// Implemented by [`crate::client::DnacClient`]; test doubles implement it to
/// script status sequences without a controller.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetch the current status of a task
    async fn task(&self, task_id: &str) -> Result<Task>;
}

/// Fixed-interval poller bound to one status source.
///
/// States: the first query happens right after dispatch. A snapshot carrying
/// a result-file id ends polling immediately. A snapshot without one costs
/// one sleep of `interval` (never more than what is left of the budget),
/// deducted from the budget; when the budget reaches zero the poller gives up
/// with [`DnacError::PollTimeout`]. A snapshot
/// flagged `isError` ends polling with [`DnacError::TaskErrored`].
pub struct TaskPoller<'a, S: TaskSource + ?Sized> {
    source: &'a S,
    policy: PollPolicy,
}

impl<'a, S: TaskSource + ?Sized> TaskPoller<'a, S> {
    pub fn new(source: &'a S, policy: PollPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll until the task reports its result-file identifier
    pub async fn wait_for_file(&self, task_id: &str) -> Result<String> {
        let mut remaining = self.policy.budget();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let task = self.source.task(task_id).await?;

            if task.is_error {
                return Err(DnacError::TaskErrored {
                    task_id: task_id.to_string(),
                    reason: task
                        .failure_reason
                        .unwrap_or_else(|| task.progress.encode()),
                });
            }

            if let Some(file_id) = task.progress.file_id() {
                info!(
                    "Task {} completed after {} status check(s), result file {}",
                    task_id, attempt, file_id
                );
                return Ok(file_id.to_string());
            }

            debug!(
                "Waiting for task {} to end (check {}, {}s of budget left)...",
                task_id,
                attempt,
                remaining.as_secs_f64()
            );
            let pause = remaining.min(self.policy.interval());
            tokio::time::sleep(pause).await;
            remaining -= pause;

            if remaining.is_zero() {
                return Err(DnacError::PollTimeout {
                    task_id: task_id.to_string(),
                    waited_secs: self.policy.budget().as_secs(),
                });
            }
        }
    }
}
