//! Client-initiated task polling operations
//!
//! These methods poll tasks that the *server* owns (created when a request the
//! client sent, such as `tools/call`, was augmented with task metadata and
//! deferred). Each is a plain `tasks/*` JSON-RPC round trip - no local state is
//! needed since the server is the source of truth for its own tasks.

#![cfg(feature = "mcp-tasks")]

use fluxmcp_protocol::types::tasks::{
    CancelTaskRequest, GetTaskPayloadRequest, GetTaskPayloadResult, GetTaskRequest,
    ListTasksRequest, ListTasksResult, Task,
};
use fluxmcp_protocol::{Error, Result};
use std::sync::atomic::Ordering;

impl<T: fluxmcp_transport::Transport + 'static> super::super::core::Client<T> {
    /// Fetch the current status of a task via `tasks/get`.
    pub async fn get_task(&self, task_id: impl Into<String>) -> Result<Task> {
        if !self.inner.initialized.load(Ordering::Relaxed) {
            return Err(Error::bad_request("Client not initialized"));
        }

        let request = GetTaskRequest {
            task_id: task_id.into(),
        };
        self.inner
            .protocol
            .request("tasks/get", Some(serde_json::to_value(request)?))
            .await
    }

    /// Cancel a server-owned task via `tasks/cancel`.
    pub async fn cancel_task(&self, task_id: impl Into<String>) -> Result<Task> {
        if !self.inner.initialized.load(Ordering::Relaxed) {
            return Err(Error::bad_request("Client not initialized"));
        }

        let request = CancelTaskRequest {
            task_id: task_id.into(),
        };
        self.inner
            .protocol
            .request("tasks/cancel", Some(serde_json::to_value(request)?))
            .await
    }

    /// List tasks owned by the server via `tasks/list`, with optional pagination.
    pub async fn list_tasks(
        &self,
        cursor: Option<String>,
        limit: Option<usize>,
    ) -> Result<ListTasksResult> {
        if !self.inner.initialized.load(Ordering::Relaxed) {
            return Err(Error::bad_request("Client not initialized"));
        }

        let request = ListTasksRequest { cursor, limit };
        self.inner
            .protocol
            .request("tasks/list", Some(serde_json::to_value(request)?))
            .await
    }

    /// Retrieve the final result payload of a completed task via `tasks/result`.
    pub async fn get_task_result(
        &self,
        task_id: impl Into<String>,
    ) -> Result<GetTaskPayloadResult> {
        if !self.inner.initialized.load(Ordering::Relaxed) {
            return Err(Error::bad_request("Client not initialized"));
        }

        let request = GetTaskPayloadRequest {
            task_id: task_id.into(),
        };
        self.inner
            .protocol
            .request("tasks/result", Some(serde_json::to_value(request)?))
            .await
    }
}
