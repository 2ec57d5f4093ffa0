//! Command-runner workflow
//!
//! Validate, dispatch, poll, fetch, interpret: the full lifecycle of one
//! read-only command batch.

use dnac_core::{BatchOutcome, CommandBatch, PollPolicy, Result};
use tracing::{info, warn};

use crate::client::DnacClient;
use crate::poller::TaskPoller;

/// Runs command batches through one authenticated client.
///
/// A failed dispatch never starts polling, and a timed-out poll never
/// fetches. The interpreted [`BatchOutcome`] is returned as-is; callers turn
/// it into an error with [`BatchOutcome::into_result`] when they need to.
pub struct CommandRunner<'a> {
    client: &'a DnacClient,
    policy: PollPolicy,
    validate: bool,
}

impl<'a> CommandRunner<'a> {
    pub fn new(client: &'a DnacClient, policy: PollPolicy) -> Self {
        Self {
            client,
            policy,
            validate: true,
        }
    }

    /// Check commands against the controller's read-only allow-list before dispatch
    pub fn validate_commands(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub async fn execute(&self, batch: &CommandBatch) -> Result<BatchOutcome> {
        if self.validate {
            let allowed = self.client.list_read_only_commands().await?;
            if allowed.is_empty() {
                warn!("Controller returned no read-only keywords, skipping command validation");
            } else {
                batch.validate_against(&allowed)?;
            }
        }

        let handle = self.client.submit(batch).await?;

        let file_id = TaskPoller::new(self.client, self.policy)
            .wait_for_file(&handle.task_id)
            .await?;

        let results = self.client.fetch_result(&file_id).await?;
        let outcome = BatchOutcome::interpret(results);

        if outcome.success() {
            info!("Batch '{}' succeeded", batch.name());
        } else {
            warn!(
                "Batch '{}' failed on {} device(s)",
                batch.name(),
                outcome.failed_devices().count()
            );
        }
        Ok(outcome)
    }
}
