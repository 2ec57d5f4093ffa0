//! Task polling policy

use crate::error::{DnacError, Result};
use std::time::Duration;

/// Default wait between two task status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default total wait before giving up on a task
pub const DEFAULT_POLL_BUDGET: Duration = Duration::from_secs(50);

/// Fixed-interval polling with a total time budget.
///
/// Each status query that does not yet report a result file costs one
/// `interval` of sleep, deducted from `budget`. Polling stops with a
/// timeout the moment the budget reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    interval: Duration,
    budget: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            budget: DEFAULT_POLL_BUDGET,
        }
    }
}

impl PollPolicy {
    /// Create a policy; the interval must be non-zero and fit in the budget
    pub fn new(interval: Duration, budget: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(DnacError::Config(
                "Poll interval must be greater than 0".to_string(),
            ));
        }
        if budget < interval {
            return Err(DnacError::Config(format!(
                "Poll budget ({}s) must be at least the poll interval ({}s)",
                budget.as_secs_f64(),
                interval.as_secs_f64()
            )));
        }
        Ok(Self { interval, budget })
    }

    /// Convenience constructor from whole seconds
    pub fn from_secs(interval: u64, budget: u64) -> Result<Self> {
        Self::new(Duration::from_secs(interval), Duration::from_secs(budget))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Upper bound on status queries before a timeout
    pub fn max_polls(&self) -> u32 {
        let interval = self.interval.as_nanos();
        self.budget.as_nanos().div_ceil(interval) as u32
    }
}
