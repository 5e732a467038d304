//! Action execution status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Live action status
///
/// The output gate only ever writes [`ActionStatus::Failed`]; every other
/// value passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Requested,
    Scheduled,
    Delayed,
    Running,
    #[default]
    Succeeded,
    Failed,
    Timeout,
    Abandoned,
    Canceling,
    Canceled,
    Pending,
    Pausing,
    Paused,
    Resuming,
}

impl ActionStatus {
    /// Terminal states: the execution will not change status on its own.
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            ActionStatus::Succeeded
                | ActionStatus::Failed
                | ActionStatus::Timeout
                | ActionStatus::Abandoned
                | ActionStatus::Canceled
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ActionStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Requested => "requested",
            ActionStatus::Scheduled => "scheduled",
            ActionStatus::Delayed => "delayed",
            ActionStatus::Running => "running",
            ActionStatus::Succeeded => "succeeded",
            ActionStatus::Failed => "failed",
            ActionStatus::Timeout => "timeout",
            ActionStatus::Abandoned => "abandoned",
            ActionStatus::Canceling => "canceling",
            ActionStatus::Canceled => "canceled",
            ActionStatus::Pending => "pending",
            ActionStatus::Pausing => "pausing",
            ActionStatus::Paused => "paused",
            ActionStatus::Resuming => "resuming",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_lowercase_names() {
        let status: ActionStatus = serde_yaml::from_str("timeout").unwrap();
        assert_eq!(status, ActionStatus::Timeout);
        assert_eq!(
            serde_json::to_string(&ActionStatus::Canceling).unwrap(),
            "\"canceling\""
        );
    }

    #[test]
    fn display_matches_serde_form() {
        let status = ActionStatus::Resuming;
        assert_eq!(
            format!("\"{}\"", status),
            serde_json::to_string(&status).unwrap()
        );
    }

    #[test]
    fn completed_states() {
        assert!(ActionStatus::Succeeded.is_completed());
        assert!(ActionStatus::Failed.is_completed());
        assert!(!ActionStatus::Running.is_completed());
        assert!(!ActionStatus::Paused.is_completed());
    }

    #[test]
    fn default_is_succeeded() {
        assert_eq!(ActionStatus::default(), ActionStatus::Succeeded);
    }
}
