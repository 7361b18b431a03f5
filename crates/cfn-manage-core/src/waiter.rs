//! Poll-based wait for a stack to finish deleting.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CfnError, CfnResult};
use crate::provisioner::Provisioner;
use crate::types::StackStatus;

/// Seconds between polls of the stack_delete_complete waiter
pub const DEFAULT_DELAY_SECS: u64 = 30;
/// Polls before the stack_delete_complete waiter gives up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

/// Poll interval and bound for the delete waiter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaiterConfig {
    /// Seconds to sleep between polls
    pub delay_secs: u64,
    /// Number of polls before giving up
    pub max_attempts: u32,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_DELAY_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl WaiterConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    /// Upper bound on time spent sleeping between polls
    pub fn max_wait(&self) -> Duration {
        self.delay()
            .checked_mul(self.max_attempts)
            .unwrap_or(Duration::MAX)
    }
}

/// What a single poll says about the delete
#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    Deleted,
    Failed,
    Pending,
}

fn classify(status: Option<&StackStatus>) -> PollOutcome {
    match status {
        None | Some(StackStatus::DeleteComplete) => PollOutcome::Deleted,
        Some(
            StackStatus::DeleteFailed
            | StackStatus::CreateFailed
            | StackStatus::RollbackFailed
            | StackStatus::UpdateRollbackFailed
            | StackStatus::UpdateRollbackInProgress
            | StackStatus::UpdateRollbackComplete
            | StackStatus::UpdateComplete,
        ) => PollOutcome::Failed,
        Some(_) => PollOutcome::Pending,
    }
}

/// Block until `stack_name` is gone.
///
/// Returns `WaitTimeout` when a poll observes a terminal failure state or the
/// attempts run out. Errors from the status call itself propagate unchanged.
pub async fn wait_until_deleted<P>(
    provisioner: &P,
    stack_name: &str,
    config: &WaiterConfig,
) -> CfnResult<()>
where
    P: Provisioner + ?Sized,
{
    let attempts = config.max_attempts.max(1);

    for attempt in 1..=attempts {
        let status = provisioner.describe_stack_status(stack_name).await?;
        debug!(stack = stack_name, attempt, status = ?status, "polled stack status");

        match classify(status.as_ref()) {
            PollOutcome::Deleted => {
                info!(stack = stack_name, attempt, "stack deleted");
                return Ok(());
            }
            PollOutcome::Failed => {
                let state = status.map(|s| s.to_string()).unwrap_or_default();
                return Err(CfnError::wait_timeout(format!(
                    "stack {} entered failure state {} while deleting",
                    stack_name, state
                )));
            }
            PollOutcome::Pending => {
                if attempt < attempts {
                    tokio::time::sleep(config.delay()).await;
                }
            }
        }
    }

    Err(CfnError::wait_timeout(format!(
        "stack {} not deleted after {} attempts",
        stack_name, attempts
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioner::MockProvisioner;
    use mockall::Sequence;

    fn fast() -> WaiterConfig {
        WaiterConfig {
            delay_secs: 0,
            max_attempts: 3,
        }
    }

    #[test]
    fn test_default_bounds() {
        let config = WaiterConfig::default();
        assert_eq!(config.delay(), Duration::from_secs(30));
        assert_eq!(config.max_wait(), Duration::from_secs(3600));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(None), PollOutcome::Deleted);
        assert_eq!(classify(Some(&StackStatus::DeleteComplete)), PollOutcome::Deleted);
        assert_eq!(classify(Some(&StackStatus::DeleteFailed)), PollOutcome::Failed);
        assert_eq!(classify(Some(&StackStatus::DeleteInProgress)), PollOutcome::Pending);
        assert_eq!(classify(Some(&StackStatus::CreateComplete)), PollOutcome::Pending);
        assert_eq!(classify(Some(&StackStatus::UpdateComplete)), PollOutcome::Failed);
        assert_eq!(
            classify(Some(&StackStatus::UpdateRollbackComplete)),
            PollOutcome::Failed
        );
    }

    #[test]
    fn test_max_wait_saturates() {
        let config: WaiterConfig =
            toml::from_str("delay_secs = 9223372036854775807\nmax_attempts = 120").unwrap();
        assert_eq!(config.max_wait(), Duration::MAX);
    }

    #[tokio::test]
    async fn test_update_complete_fails_immediately() {
        let mut mock = MockProvisioner::new();
        mock.expect_describe_stack_status()
            .times(1)
            .returning(|_| Ok(Some(StackStatus::UpdateComplete)));

        let config = WaiterConfig {
            delay_secs: 0,
            max_attempts: 5,
        };
        let err = wait_until_deleted(&mock, "s", &config).await.unwrap_err();
        assert!(matches!(err, CfnError::WaitTimeout(ref msg) if msg.contains("UPDATE_COMPLETE")));
    }

    #[tokio::test]
    async fn test_waits_through_in_progress() {
        let mut mock = MockProvisioner::new();
        let mut seq = Sequence::new();
        mock.expect_describe_stack_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(StackStatus::DeleteInProgress)));
        mock.expect_describe_stack_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        wait_until_deleted(&mock, "s", &fast()).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_state_stops_waiting() {
        let mut mock = MockProvisioner::new();
        mock.expect_describe_stack_status()
            .times(1)
            .returning(|_| Ok(Some(StackStatus::DeleteFailed)));

        let err = wait_until_deleted(&mock, "s", &fast()).await.unwrap_err();
        assert!(matches!(err, CfnError::WaitTimeout(ref msg) if msg.contains("DELETE_FAILED")));
    }

    #[tokio::test]
    async fn test_attempts_exhausted() {
        let mut mock = MockProvisioner::new();
        mock.expect_describe_stack_status()
            .times(3)
            .returning(|_| Ok(Some(StackStatus::DeleteInProgress)));

        let err = wait_until_deleted(&mock, "s", &fast()).await.unwrap_err();
        assert!(matches!(err, CfnError::WaitTimeout(_)));
    }

    #[tokio::test]
    async fn test_describe_error_propagates() {
        let mut mock = MockProvisioner::new();
        mock.expect_describe_stack_status()
            .times(1)
            .returning(|_| Err(CfnError::provisioning("access denied")));

        let err = wait_until_deleted(&mock, "s", &fast()).await.unwrap_err();
        assert!(matches!(err, CfnError::Provisioning(_)));
    }
}
