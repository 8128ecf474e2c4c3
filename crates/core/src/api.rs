//! Typed client for the task backend's REST surface.
//!
//! Every call maps a non-success status to [`ApiError::Request`] with the raw
//! body attached and never retries.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    Area, AreaPayload, MutationReply, NewProject, NewSubtask, NewTask, Project, ProjectUpdate,
    Subtask, SubtaskUpdate, Task, TaskScope, TaskUpdate,
};

/// The task operations the collection store and completion toggle rely on.
#[async_trait]
pub trait TaskRemote: Send + Sync {
    async fn fetch_tasks(&self, scope: TaskScope) -> ApiResult<Vec<Task>>;
    async fn delete_task(&self, id: i64) -> ApiResult<()>;
    async fn mark_completed(&self, id: i64) -> ApiResult<()>;
    async fn mark_not_completed(&self, id: i64) -> ApiResult<()>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_areas(&self) -> ApiResult<Vec<Area>> {
        self.get("/areas").await
    }

    pub async fn get_area(&self, id: i64) -> ApiResult<Area> {
        self.get(&format!("/areas/{id}")).await
    }

    pub async fn create_area(&self, name: &str) -> ApiResult<MutationReply> {
        let payload = AreaPayload {
            name: name.to_string(),
        };
        self.mutate(Method::POST, "/areas", Some(&payload)).await
    }

    pub async fn update_area(&self, id: i64, name: &str) -> ApiResult<MutationReply> {
        let payload = AreaPayload {
            name: name.to_string(),
        };
        self.mutate(Method::PUT, &format!("/areas/{id}"), Some(&payload))
            .await
    }

    pub async fn delete_area(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/areas/{id}")).await
    }

    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get("/projects").await
    }

    pub async fn get_project(&self, id: i64) -> ApiResult<Project> {
        self.get(&format!("/projects/{id}")).await
    }

    pub async fn list_projects_by_area(&self, area_id: i64) -> ApiResult<Vec<Project>> {
        self.get(&format!("/areas/{area_id}/projects")).await
    }

    pub async fn create_project(&self, project: &NewProject) -> ApiResult<MutationReply> {
        self.mutate(Method::POST, "/projects", Some(project)).await
    }

    pub async fn update_project(
        &self,
        id: i64,
        update: &ProjectUpdate,
    ) -> ApiResult<MutationReply> {
        self.mutate(Method::PUT, &format!("/projects/{id}"), Some(update))
            .await
    }

    pub async fn delete_project(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/projects/{id}")).await
    }

    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.get("/tasks").await
    }

    pub async fn get_task(&self, id: i64) -> ApiResult<Task> {
        self.get(&format!("/tasks/{id}")).await
    }

    pub async fn list_tasks_by_project(&self, project_id: i64) -> ApiResult<Vec<Task>> {
        self.get(&format!("/projects/{project_id}/tasks")).await
    }

    pub async fn create_task(&self, task: &NewTask) -> ApiResult<MutationReply> {
        self.mutate(Method::POST, "/tasks", Some(task)).await
    }

    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> ApiResult<MutationReply> {
        self.mutate(Method::PUT, &format!("/tasks/{id}"), Some(update))
            .await
    }

    pub async fn mark_completed(&self, id: i64) -> ApiResult<MutationReply> {
        self.mutate::<()>(Method::PUT, &format!("/tasks/{id}/complete"), None)
            .await
    }

    pub async fn mark_not_completed(&self, id: i64) -> ApiResult<MutationReply> {
        self.mutate::<()>(Method::PUT, &format!("/tasks/{id}/not_complete"), None)
            .await
    }

    pub async fn delete_task(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/tasks/{id}")).await
    }

    pub async fn list_subtasks(&self, task_id: i64) -> ApiResult<Vec<Subtask>> {
        self.get(&format!("/tasks/{task_id}/subtasks")).await
    }

    pub async fn create_subtask(
        &self,
        task_id: i64,
        subtask: &NewSubtask,
    ) -> ApiResult<MutationReply> {
        self.mutate(
            Method::POST,
            &format!("/tasks/{task_id}/subtasks"),
            Some(subtask),
        )
        .await
    }

    pub async fn update_subtask(
        &self,
        id: i64,
        update: &SubtaskUpdate,
    ) -> ApiResult<MutationReply> {
        self.mutate(Method::PUT, &format!("/subtasks/{id}"), Some(update))
            .await
    }

    pub async fn delete_subtask(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/subtasks/{id}")).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.send::<()>(Method::GET, path, None).await?;
        decode(&Method::GET, path, &body)
    }

    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> ApiResult<MutationReply> {
        let body = self.send(method.clone(), path, payload).await?;
        if body.trim().is_empty() {
            return Ok(MutationReply::default());
        }
        decode(&method, path, &body)
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> ApiResult<String> {
        let url = self.endpoint(path)?;
        tracing::debug!(method = %method, path, "task api request");

        let mut request = self.http.request(method.clone(), url);
        if method != Method::GET {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|err| {
            tracing::warn!(method = %method, path, error = %err, "task api unreachable");
            ApiError::Network(err)
        })?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(method = %method, path, status = %status, "task api request failed");
            return Err(ApiError::Request { status, body });
        }
        Ok(body)
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        let raw = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|_| ApiError::InvalidUrl(raw))
    }
}

#[async_trait]
impl TaskRemote for ApiClient {
    async fn fetch_tasks(&self, scope: TaskScope) -> ApiResult<Vec<Task>> {
        match scope {
            TaskScope::All => self.list_tasks().await,
            TaskScope::Project(id) => self.list_tasks_by_project(id).await,
        }
    }

    async fn delete_task(&self, id: i64) -> ApiResult<()> {
        ApiClient::delete_task(self, id).await
    }

    async fn mark_completed(&self, id: i64) -> ApiResult<()> {
        ApiClient::mark_completed(self, id).await.map(|_| ())
    }

    async fn mark_not_completed(&self, id: i64) -> ApiResult<()> {
        ApiClient::mark_not_completed(self, id).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(method: &Method, path: &str, body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        context: format!("{method} {path}"),
        source,
    })
}
