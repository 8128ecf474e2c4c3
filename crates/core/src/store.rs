//! In-memory task collection for one scope, kept in sync with the backend.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::api::TaskRemote;
use crate::category::{filter_tasks, Category};
use crate::error::ApiResult;
use crate::model::{Task, TaskScope};
use crate::telemetry::{self, Event};
use crate::toggle::CompletionToggle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one started fetch. Only the most recently issued ticket may
/// replace the held tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    scope: TaskScope,
    generation: u64,
}

impl LoadTicket {
    pub fn scope(&self) -> TaskScope {
        self.scope
    }
}

pub struct TaskStore {
    remote: Arc<dyn TaskRemote>,
    scope: TaskScope,
    tasks: Vec<Task>,
    phase: LoadPhase,
    error: Option<String>,
    generation: u64,
    telemetry: telemetry::Handle,
}

impl TaskStore {
    pub fn new(remote: Arc<dyn TaskRemote>, scope: TaskScope) -> Self {
        Self {
            remote,
            scope,
            tasks: Vec::new(),
            phase: LoadPhase::Idle,
            error: None,
            generation: 0,
            telemetry: telemetry::Handle::new(),
        }
    }

    pub fn scope(&self) -> TaskScope {
        self.scope
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn telemetry(&self) -> &telemetry::Handle {
        &self.telemetry
    }

    pub fn remote(&self) -> Arc<dyn TaskRemote> {
        Arc::clone(&self.remote)
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn filtered(&self, category: Category, now: DateTime<FixedOffset>) -> Vec<&Task> {
        filter_tasks(&self.tasks, category, now)
    }

    /// Starts a fetch for `scope`, superseding any fetch still in flight.
    pub fn begin_load(&mut self, scope: TaskScope) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.scope = scope;
        self.phase = LoadPhase::Loading;
        self.error = None;
        self.telemetry
            .record(Event::RefreshRequested(scope.to_string()));
        LoadTicket {
            scope,
            generation: self.generation,
        }
    }

    /// Applies the outcome of `ticket`'s fetch. Returns `false` when a newer
    /// fetch has been started since, in which case nothing changes.
    pub fn apply_loaded(&mut self, ticket: LoadTicket, result: ApiResult<Vec<Task>>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                scope = %ticket.scope,
                generation = ticket.generation,
                latest = self.generation,
                "discarding superseded task fetch"
            );
            self.telemetry.record(Event::RefreshDiscarded {
                scope: ticket.scope.to_string(),
                generation: ticket.generation,
            });
            return false;
        }

        match result {
            Ok(tasks) => {
                self.telemetry.record(Event::RefreshCompleted {
                    scope: ticket.scope.to_string(),
                    count: tasks.len(),
                });
                self.tasks = tasks;
                self.phase = LoadPhase::Ready;
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(scope = %ticket.scope, error = %message, "failed to fetch tasks");
                self.telemetry.record(Event::RefreshFailed {
                    scope: ticket.scope.to_string(),
                    error: message.clone(),
                });
                self.phase = LoadPhase::Failed;
                self.error = Some(message);
            }
        }
        true
    }

    /// Re-fetches the current scope.
    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin_load(self.scope);
        let remote = self.remote();
        let result = remote.fetch_tasks(ticket.scope).await;
        self.apply_loaded(ticket, result)
    }

    /// Switches to `scope`, fetching only when it differs from the current
    /// one or nothing has been loaded yet.
    pub async fn set_scope(&mut self, scope: TaskScope) -> bool {
        if scope == self.scope && self.phase != LoadPhase::Idle {
            return false;
        }
        self.scope = scope;
        self.refresh().await
    }

    /// Deletes a task on the backend and drops it locally once confirmed.
    /// A success leaves an earlier failure's phase and error in place; only a
    /// new load clears them.
    pub async fn delete_task(&mut self, id: i64) -> bool {
        let remote = self.remote();
        match remote.delete_task(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                self.telemetry
                    .record(Event::MutationApplied(format!("delete {id}")));
                true
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(task_id = id, error = %message, "failed to delete task");
                self.telemetry.record(Event::MutationFailed {
                    action: format!("delete {id}"),
                    error: message.clone(),
                });
                self.phase = LoadPhase::Failed;
                self.error = Some(message);
                false
            }
        }
    }

    /// Optimistically flips a held task's completion flag. A failed call
    /// restores the flag and is reported through [`TaskStore::error`].
    pub async fn toggle_completion(&mut self, id: i64) -> bool {
        let Some(position) = self.tasks.iter().position(|task| task.id == id) else {
            tracing::debug!(task_id = id, "toggle requested for task not in store");
            return false;
        };

        let mut toggle = CompletionToggle::new(&self.tasks[position]);
        let Some(request) = toggle.begin() else {
            return false;
        };
        self.tasks[position].completed = toggle.checked();

        let remote = self.remote();
        let result = toggle.settle(request.send(remote.as_ref()).await);
        self.tasks[position].completed = toggle.checked();

        let action = if request.target {
            format!("complete {id}")
        } else {
            format!("reopen {id}")
        };
        match result {
            Ok(()) => {
                self.telemetry.record(Event::MutationApplied(action));
                true
            }
            Err(err) => {
                let message = err.to_string();
                self.telemetry.record(Event::MutationFailed {
                    action,
                    error: message.clone(),
                });
                self.error = Some(message);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_task, FakeRemote};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn store_with(tasks: Vec<Task>) -> (TaskStore, Arc<FakeRemote>) {
        let remote = Arc::new(FakeRemote::with_tasks(TaskScope::All, tasks));
        let store = TaskStore::new(remote.clone(), TaskScope::All);
        (store, remote)
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|task| task.id).collect()
    }

    #[tokio::test]
    async fn refresh_moves_from_idle_to_ready() {
        let (mut store, remote) = store_with(vec![sample_task(1, None), sample_task(2, Some(4))]);
        assert_eq!(store.phase(), LoadPhase::Idle);

        assert!(store.refresh().await);

        assert_eq!(store.phase(), LoadPhase::Ready);
        assert_eq!(ids(store.tasks()), vec![1, 2]);
        assert!(store.error().is_none());
        assert_eq!(remote.calls(), vec!["fetch all"]);
    }

    #[tokio::test]
    async fn failed_refresh_sets_error() {
        let (mut store, remote) = store_with(vec![sample_task(1, None)]);
        remote.set_failing(true);

        store.refresh().await;

        assert_eq!(store.phase(), LoadPhase::Failed);
        assert_eq!(store.error(), Some("Error 500 Internal Server Error: boom"));
    }

    #[test]
    fn begin_load_enters_loading_and_clears_error() {
        let (mut store, _remote) = store_with(vec![]);
        let first = store.begin_load(TaskScope::All);
        store.apply_loaded(
            first,
            Err(crate::error::ApiError::InvalidUrl("x".into())),
        );
        assert!(store.error().is_some());

        let ticket = store.begin_load(TaskScope::Project(3));
        assert!(store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(ticket.scope(), TaskScope::Project(3));
        assert_eq!(store.scope(), TaskScope::Project(3));
    }

    #[test]
    fn superseded_fetch_results_are_discarded() {
        let (mut store, _remote) = store_with(vec![]);
        let all = store.begin_load(TaskScope::All);
        let project = store.begin_load(TaskScope::Project(5));

        assert!(store.apply_loaded(project, Ok(vec![sample_task(9, Some(5))])));
        assert!(!store.apply_loaded(all, Ok(vec![sample_task(1, None), sample_task(2, None)])));

        assert_eq!(ids(store.tasks()), vec![9]);
        assert_eq!(store.phase(), LoadPhase::Ready);
        if store.telemetry().is_enabled() {
            assert!(store
                .telemetry()
                .events()
                .iter()
                .any(|event| matches!(event, Event::RefreshDiscarded { generation: 1, .. })));
        }
    }

    #[test]
    fn stale_failure_does_not_override_newer_success() {
        let (mut store, _remote) = store_with(vec![]);
        let old = store.begin_load(TaskScope::All);
        let new = store.begin_load(TaskScope::All);

        store.apply_loaded(new, Ok(vec![sample_task(1, None)]));
        store.apply_loaded(old, Err(crate::error::ApiError::InvalidUrl("x".into())));

        assert_eq!(store.phase(), LoadPhase::Ready);
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn set_scope_fetches_only_on_change() {
        let remote = Arc::new(FakeRemote::with_tasks(
            TaskScope::Project(2),
            vec![sample_task(4, Some(2))],
        ));
        let mut store = TaskStore::new(remote.clone(), TaskScope::Project(2));

        assert!(store.set_scope(TaskScope::Project(2)).await);
        assert!(!store.set_scope(TaskScope::Project(2)).await);
        assert!(store.set_scope(TaskScope::Project(7)).await);

        assert_eq!(remote.calls(), vec!["fetch project:2", "fetch project:7"]);
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_confirmed_task() {
        let (mut store, remote) = store_with(vec![
            sample_task(1, None),
            sample_task(2, None),
            sample_task(3, Some(1)),
        ]);
        store.refresh().await;

        assert!(store.delete_task(2).await);

        assert_eq!(ids(store.tasks()), vec![1, 3]);
        assert!(store.find(2).is_none());
        assert_eq!(store.phase(), LoadPhase::Ready);
        assert_eq!(remote.calls(), vec!["fetch all", "delete 2"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_collection_and_reports() {
        let (mut store, remote) = store_with(vec![sample_task(1, None), sample_task(2, None)]);
        store.refresh().await;
        let before = store.tasks().to_vec();
        remote.set_failing(true);

        assert!(!store.delete_task(2).await);

        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(store.phase(), LoadPhase::Failed);
        assert!(store.error().is_some());
    }

    #[tokio::test]
    async fn delete_error_persists_until_next_load() {
        let (mut store, remote) = store_with(vec![sample_task(1, None), sample_task(2, None)]);
        store.refresh().await;
        remote.set_failing(true);
        assert!(!store.delete_task(1).await);
        remote.set_failing(false);

        assert!(store.delete_task(2).await);

        assert_eq!(ids(store.tasks()), vec![1]);
        assert_eq!(store.phase(), LoadPhase::Failed);
        assert_eq!(store.error(), Some("Error 500 Internal Server Error: boom"));

        store.refresh().await;
        assert_eq!(store.phase(), LoadPhase::Ready);
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn toggle_completion_updates_only_target_task() {
        let (mut store, remote) = store_with(vec![sample_task(1, None), sample_task(2, None)]);
        store.refresh().await;

        assert!(store.toggle_completion(2).await);

        assert!(store.find(2).unwrap().completed);
        assert!(!store.find(1).unwrap().completed);
        assert_eq!(remote.calls(), vec!["fetch all", "complete 2"]);
    }

    #[tokio::test]
    async fn failed_toggle_rolls_back_and_surfaces_error() {
        let (mut store, remote) = store_with(vec![sample_task(1, None)]);
        store.refresh().await;
        remote.set_failing(true);

        assert!(!store.toggle_completion(1).await);

        assert!(!store.find(1).unwrap().completed);
        assert!(store.error().is_some());
        assert_eq!(store.phase(), LoadPhase::Ready);
    }

    #[tokio::test]
    async fn toggle_for_unknown_task_makes_no_call() {
        let (mut store, remote) = store_with(vec![sample_task(1, None)]);
        store.refresh().await;

        assert!(!store.toggle_completion(42).await);
        assert_eq!(remote.calls(), vec!["fetch all"]);
    }

    #[tokio::test]
    async fn filtered_view_follows_held_tasks() {
        let mut due_today = sample_task(2, Some(5));
        due_today.due_date = Some("2026-10-15".into());
        let (mut store, _remote) = store_with(vec![sample_task(1, None), due_today]);
        store.refresh().await;
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 15, 9, 0, 0)
            .unwrap();

        let inbox: Vec<i64> = store
            .filtered(Category::Inbox, now)
            .iter()
            .map(|task| task.id)
            .collect();
        let today: Vec<i64> = store
            .filtered(Category::Today, now)
            .iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(inbox, vec![1]);
        assert_eq!(today, vec![2]);
    }
}
