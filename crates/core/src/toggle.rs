//! Optimistic completion toggle for a single displayed task.
//!
//! The displayed flag flips before the backend is asked, then is either kept
//! (`Committed`) or restored (`RolledBack`) once the call settles.

use crate::api::TaskRemote;
use crate::error::ApiResult;
use crate::model::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    Idle,
    Pending { previous: bool },
    Committed,
    RolledBack,
}

/// The remote call a started toggle needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRequest {
    pub task_id: i64,
    pub target: bool,
}

impl ToggleRequest {
    pub async fn send(&self, remote: &dyn TaskRemote) -> ApiResult<()> {
        if self.target {
            remote.mark_completed(self.task_id).await
        } else {
            remote.mark_not_completed(self.task_id).await
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionToggle {
    task_id: i64,
    checked: bool,
    phase: TogglePhase,
}

impl CompletionToggle {
    pub fn new(task: &Task) -> Self {
        Self::for_task(task.id, task.completed)
    }

    pub fn for_task(task_id: i64, completed: bool) -> Self {
        Self {
            task_id,
            checked: completed,
            phase: TogglePhase::Idle,
        }
    }

    /// The value to display right now.
    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn phase(&self) -> TogglePhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, TogglePhase::Pending { .. })
    }

    /// Flips the displayed value and returns the call to make. `None` while a
    /// previous toggle is still unsettled.
    pub fn begin(&mut self) -> Option<ToggleRequest> {
        if self.is_pending() {
            return None;
        }
        let previous = self.checked;
        self.checked = !previous;
        self.phase = TogglePhase::Pending { previous };
        Some(ToggleRequest {
            task_id: self.task_id,
            target: self.checked,
        })
    }

    /// Commits or rolls back the pending flip and hands the result back.
    pub fn settle(&mut self, result: ApiResult<()>) -> ApiResult<()> {
        let TogglePhase::Pending { previous } = self.phase else {
            return result;
        };
        match &result {
            Ok(()) => self.phase = TogglePhase::Committed,
            Err(err) => {
                tracing::warn!(
                    task_id = self.task_id,
                    error = %err,
                    "failed to update task completion, reverting"
                );
                self.checked = previous;
                self.phase = TogglePhase::RolledBack;
            }
        }
        result
    }

    pub async fn toggle(&mut self, remote: &dyn TaskRemote) -> ApiResult<()> {
        let Some(request) = self.begin() else {
            return Ok(());
        };
        let result = request.send(remote).await;
        self.settle(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRemote;
    use pretty_assertions::assert_eq;

    #[test]
    fn begin_flips_immediately_and_blocks_reentry() {
        let mut toggle = CompletionToggle::for_task(3, false);
        let request = toggle.begin().expect("first toggle starts");

        assert_eq!(
            request,
            ToggleRequest {
                task_id: 3,
                target: true
            }
        );
        assert!(toggle.checked());
        assert_eq!(toggle.phase(), TogglePhase::Pending { previous: false });
        assert!(toggle.begin().is_none());
    }

    #[tokio::test]
    async fn success_keeps_optimistic_value() {
        let remote = FakeRemote::new();
        let mut toggle = CompletionToggle::for_task(3, false);

        toggle.toggle(&remote).await.expect("toggle succeeds");

        assert!(toggle.checked());
        assert_eq!(toggle.phase(), TogglePhase::Committed);
        assert_eq!(remote.calls(), vec!["complete 3"]);
    }

    #[tokio::test]
    async fn failure_restores_previous_value() {
        let remote = FakeRemote::new();
        remote.set_failing(true);
        let mut toggle = CompletionToggle::for_task(8, true);

        let err = toggle.toggle(&remote).await.unwrap_err();

        assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
        assert!(toggle.checked());
        assert_eq!(toggle.phase(), TogglePhase::RolledBack);
        assert_eq!(remote.calls(), vec!["not_complete 8"]);
    }

    #[tokio::test]
    async fn two_toggles_return_to_original_with_two_calls() {
        let remote = FakeRemote::new();
        let mut toggle = CompletionToggle::for_task(5, false);

        toggle.toggle(&remote).await.expect("complete");
        toggle.toggle(&remote).await.expect("reopen");

        assert!(!toggle.checked());
        assert_eq!(remote.calls(), vec!["complete 5", "not_complete 5"]);
    }

    #[test]
    fn settle_without_pending_is_passthrough() {
        let mut toggle = CompletionToggle::for_task(1, false);
        assert!(toggle.settle(Ok(())).is_ok());
        assert_eq!(toggle.phase(), TogglePhase::Idle);
        assert!(!toggle.checked());
    }
}
