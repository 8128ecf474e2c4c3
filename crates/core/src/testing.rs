use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::api::TaskRemote;
use crate::error::{ApiError, ApiResult};
use crate::model::{Task, TaskScope, DEFAULT_PRIORITY};

/// In-memory [`TaskRemote`] recording every call it receives.
#[derive(Default)]
pub(crate) struct FakeRemote {
    tasks: Mutex<HashMap<TaskScope, Vec<Task>>>,
    failing: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl FakeRemote {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_tasks(scope: TaskScope, tasks: Vec<Task>) -> Self {
        let remote = Self::new();
        remote.tasks.lock().insert(scope, tasks);
        remote
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn answer(&self, call: String) -> ApiResult<()> {
        self.calls.lock().push(call);
        if *self.failing.lock() {
            return Err(ApiError::Request {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRemote for FakeRemote {
    async fn fetch_tasks(&self, scope: TaskScope) -> ApiResult<Vec<Task>> {
        self.answer(format!("fetch {scope}"))?;
        Ok(self.tasks.lock().get(&scope).cloned().unwrap_or_default())
    }

    async fn delete_task(&self, id: i64) -> ApiResult<()> {
        self.answer(format!("delete {id}"))?;
        for tasks in self.tasks.lock().values_mut() {
            tasks.retain(|task| task.id != id);
        }
        Ok(())
    }

    async fn mark_completed(&self, id: i64) -> ApiResult<()> {
        self.answer(format!("complete {id}"))
    }

    async fn mark_not_completed(&self, id: i64) -> ApiResult<()> {
        self.answer(format!("not_complete {id}"))
    }
}

pub(crate) fn sample_task(id: i64, project_id: Option<i64>) -> Task {
    Task {
        id,
        title: format!("Task {id}"),
        description: None,
        priority: DEFAULT_PRIORITY.to_string(),
        due_date: None,
        tags: None,
        completed: false,
        project_id,
        category: None,
        created: String::new(),
        updated: String::new(),
        subtasks: None,
    }
}
