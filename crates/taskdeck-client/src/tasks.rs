//! Remote task client: one HTTP round trip per operation

use std::time::Duration;

use reqwest::Method;
use tracing::debug;

use taskdeck_api::{
    CreateTaskRequest, Task, TaskListResponse, TaskPriority, TaskStatus, UpdatePriorityRequest,
    UpdateStatusRequest,
};

use crate::error::{ApiError, ApiResult};
use crate::http::{decode_json, expect_success, join_url};

/// Client for the `/tasks` endpoints. Every operation requires a bearer
/// token; calls made without one return [`ApiError::MissingToken`] before
/// any request is issued.
#[derive(Clone)]
pub struct TaskApiClient {
    client: reqwest::Client,
    server_url: String,
    bearer_token: Option<String>,
}

/// Builder for the task client
pub struct TaskApiClientBuilder {
    server_url: String,
    timeout: Option<Duration>,
}

impl TaskApiClientBuilder {
    /// Create a new client builder with the required server URL
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            timeout: None,
        }
    }

    /// Set the default timeout for requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> ApiResult<TaskApiClient> {
        let mut client_builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(TaskApiClient {
            client,
            server_url: self.server_url,
            bearer_token: None,
        })
    }
}

impl TaskApiClient {
    pub fn builder(server_url: impl Into<String>) -> TaskApiClientBuilder {
        TaskApiClientBuilder::new(server_url)
    }

    /// Set the bearer token for authentication
    pub fn set_bearer_token(&mut self, token: Option<impl Into<String>>) {
        self.bearer_token = token.map(|t| t.into());
    }

    /// Get a reference to the bearer token
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Fetch the full task collection. The Authorization header is sent on
    /// list like on every other call.
    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        debug!("Fetching task list");

        let response = self.request(Method::GET, "tasks")?.send().await?;
        let list: TaskListResponse = decode_json(response).await?;
        Ok(list.into_tasks())
    }

    /// Create a task with the given text and the store defaults (status
    /// `pending`, priority `medium`). Returns the created record with its
    /// server-assigned id.
    pub async fn create_task(&self, text: impl Into<String>) -> ApiResult<Task> {
        let body = CreateTaskRequest::new(text);
        debug!("Creating task: {}", body.text);

        let response = self
            .request(Method::POST, "tasks")?
            .json(&body)
            .send()
            .await?;
        decode_json(response).await
    }

    /// Delete the task with the given id. Success needs no response body.
    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        debug!("Deleting task: {}", id);

        let response = self
            .request(Method::DELETE, &format!("tasks/{}", id))?
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    /// Toggle the task's status (pending ↔ complete) and return the updated
    /// record. The toggle is computed from `current` client-side; the server
    /// receives the new value.
    pub async fn update_status(&self, id: &str, current: TaskStatus) -> ApiResult<Task> {
        let status = current.toggled();
        debug!("Updating task {} status to {}", id, status);

        let response = self
            .request(Method::PATCH, &format!("tasks/{}/status", id))?
            .json(&UpdateStatusRequest { status })
            .send()
            .await?;
        decode_json(response).await
    }

    /// Set the task's priority to an explicit value and return the updated
    /// record.
    pub async fn update_priority(&self, id: &str, priority: TaskPriority) -> ApiResult<Task> {
        debug!("Updating task {} priority to {}", id, priority);

        let response = self
            .request(Method::PATCH, &format!("tasks/{}/priority", id))?
            .json(&UpdatePriorityRequest { priority })
            .send()
            .await?;
        decode_json(response).await
    }

    /// Start a request with the bearer token attached, or fail without
    /// touching the network when no token is set.
    fn request(&self, method: Method, path: &str) -> ApiResult<reqwest::RequestBuilder> {
        let token = self.bearer_token.as_deref().ok_or(ApiError::MissingToken)?;
        let url = join_url(&self.server_url, path);

        Ok(self
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", token)))
    }
}
