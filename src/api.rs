use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ListQuery, Stats, Task, TaskInput, TaskPage};

/// Fallback messages used when the service fails without a usable message
/// of its own. One per operation, shown verbatim in the UI.
pub const FETCH_TASKS_FAILED: &str = "Failed to fetch tasks";
pub const FETCH_STATS_FAILED: &str = "Failed to fetch stats";
pub const CREATE_TASK_FAILED: &str = "Failed to create task";
pub const UPDATE_TASK_FAILED: &str = "Failed to update task";
pub const DELETE_TASK_FAILED: &str = "Failed to delete task";
pub const TOGGLE_TASK_FAILED: &str = "Failed to toggle task";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service rejected the request with a human-readable message.
    #[error("{0}")]
    Rejected(String),
    /// Transport, decoding, or message-less server failure. Displays as the
    /// per-operation fallback; the underlying cause goes to the log.
    #[error("{0}")]
    Failed(&'static str),
}

/// The remote task service, one method per operation. The store is generic
/// over this trait so its behavior can be exercised without a server.
#[cfg_attr(test, mockall::automock)]
pub trait TaskService {
    fn list(&self, query: &ListQuery) -> Result<TaskPage, ApiError>;
    fn stats(&self) -> Result<Stats, ApiError>;
    fn create(&self, input: &TaskInput) -> Result<Task, ApiError>;
    fn update(&self, id: &str, input: &TaskInput) -> Result<Task, ApiError>;
    fn delete(&self, id: &str) -> Result<(), ApiError>;
    fn toggle(&self, id: &str) -> Result<Task, ApiError>;
}

/// Error body shape used by the service: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the task service.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and decode a JSON body, mapping every failure to the
    /// message contract: the server's own message when it sent one,
    /// otherwise the per-operation fallback.
    fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let resp = self.send(req, fallback)?;
        resp.json().map_err(|e| {
            warn!(error = %e, "failed to decode response body");
            ApiError::Failed(fallback)
        })
    }

    /// Like `execute`, for endpoints whose success response has no body we
    /// care about (delete).
    fn execute_empty(&self, req: RequestBuilder, fallback: &'static str) -> Result<(), ApiError> {
        self.send(req, fallback).map(|_| ())
    }

    fn send(&self, req: RequestBuilder, fallback: &'static str) -> Result<Response, ApiError> {
        let resp = self.authorize(req).send().map_err(|e| {
            warn!(error = %e, "request failed");
            ApiError::Failed(fallback)
        })?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ErrorBody>()
            .ok()
            .map(|body| body.message)
            .filter(|m| !m.trim().is_empty());
        match message {
            Some(message) => {
                debug!(%status, message, "service rejected request");
                Err(ApiError::Rejected(message))
            }
            None => {
                warn!(%status, "service error without message");
                Err(ApiError::Failed(fallback))
            }
        }
    }
}

impl TaskService for ApiClient {
    fn list(&self, query: &ListQuery) -> Result<TaskPage, ApiError> {
        debug!(page = query.page, limit = query.limit, "listing tasks");
        let req = self
            .client
            .get(self.url("/tasks"))
            .query(&query.to_params());
        self.execute(req, FETCH_TASKS_FAILED)
    }

    fn stats(&self) -> Result<Stats, ApiError> {
        let req = self.client.get(self.url("/tasks/stats"));
        self.execute(req, FETCH_STATS_FAILED)
    }

    fn create(&self, input: &TaskInput) -> Result<Task, ApiError> {
        let req = self.client.post(self.url("/tasks")).json(input);
        self.execute(req, CREATE_TASK_FAILED)
    }

    fn update(&self, id: &str, input: &TaskInput) -> Result<Task, ApiError> {
        let req = self
            .client
            .put(self.url(&format!("/tasks/{}", id)))
            .json(input);
        self.execute(req, UPDATE_TASK_FAILED)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let req = self.client.delete(self.url(&format!("/tasks/{}", id)));
        self.execute_empty(req, DELETE_TASK_FAILED)
    }

    fn toggle(&self, id: &str) -> Result<Task, ApiError> {
        let req = self
            .client
            .patch(self.url(&format!("/tasks/{}/toggle", id)));
        self.execute(req, TOGGLE_TASK_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/api/", None);
        assert_eq!(client.url("/tasks"), "http://localhost:5000/api/tasks");
        assert_eq!(
            client.url("/tasks/abc/toggle"),
            "http://localhost:5000/api/tasks/abc/toggle"
        );
    }

    #[test]
    fn error_messages_render_verbatim() {
        let rejected = ApiError::Rejected("Title already exists".to_string());
        assert_eq!(rejected.to_string(), "Title already exists");

        let failed = ApiError::Failed(CREATE_TASK_FAILED);
        assert_eq!(failed.to_string(), "Failed to create task");
    }

    #[test]
    fn error_body_parses_message_field() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": "No such task"}"#).unwrap();
        assert_eq!(body.message, "No such task");
    }
}
