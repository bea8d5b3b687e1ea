//! Internal task registry for the MCP task lifecycle
//!
//! Per MCP's task augmentation mechanism, either side of a connection can defer
//! a request into a long-running task. This registry tracks tasks that THIS
//! client owns - created when the client decides to process a server-initiated
//! request (elicitation, sampling, ...) asynchronously rather than answering it
//! immediately - so it can answer the server's `tasks/get`, `tasks/list`,
//! `tasks/result` and `tasks/cancel` polling requests.
//!
//! Client-initiated task polling (where the client polls a task the *server*
//! owns) doesn't need a local registry: those calls are plain `protocol.request()`
//! round-trips, implemented in `operations::tasks`.

#![cfg(feature = "mcp-tasks")]

use dashmap::DashMap;
use fluxmcp_protocol::types::tasks::{ListTasksResult, Task, TaskStatus};

/// In-memory store of tasks this client owns, keyed by task id.
#[derive(Debug, Default)]
pub(super) struct TaskRegistry {
    tasks: DashMap<String, Task>,
}

impl TaskRegistry {
    pub(super) fn new() -> Self {
        Self {
            tasks: DashMap::new(),
        }
    }

    /// Insert or update a task record.
    ///
    /// Updates are only applied if the incoming record is strictly newer than
    /// what's stored, per `last_updated_at`. Equal timestamps keep the
    /// existing record, so a retried or duplicated status update can't win a
    /// race against the original.
    pub(super) fn upsert(&self, task: Task) {
        match self.tasks.entry(task.task_id.clone()) {
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(task);
            }
            dashmap::mapref::entry::Entry::Occupied(mut slot) => {
                if task.last_updated_at.as_str() > slot.get().last_updated_at.as_str() {
                    slot.insert(task);
                }
            }
        }
    }

    pub(super) fn get(&self, task_id: &str) -> Option<Task> {
        self.tasks.get(task_id).map(|entry| entry.clone())
    }

    pub(super) fn list(&self, cursor: Option<&str>, limit: Option<usize>) -> ListTasksResult {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|e| e.value().clone()).collect();
        tasks.sort_by(|a, b| a.task_id.cmp(&b.task_id));

        let start = cursor
            .and_then(|c| tasks.iter().position(|t| t.task_id == c).map(|i| i + 1))
            .unwrap_or(0);

        let limit = limit.unwrap_or(50).max(1);
        let page: Vec<Task> = tasks.iter().skip(start).take(limit).cloned().collect();
        let next_cursor = if start + page.len() < tasks.len() {
            page.last().map(|t| t.task_id.clone())
        } else {
            None
        };

        ListTasksResult {
            tasks: page,
            next_cursor,
            _meta: None,
        }
    }

    /// Cancel a task owned by this client.
    ///
    /// If the task is unknown (already evicted, or never existed), synthesize
    /// a terminal `Cancelled` record rather than erroring - the server only
    /// needs to know the task is no longer outstanding.
    pub(super) fn cancel(&self, task_id: &str, now: &str) -> Task {
        let mut entry = self
            .tasks
            .entry(task_id.to_string())
            .or_insert_with(|| Task {
                task_id: task_id.to_string(),
                status: TaskStatus::Cancelled,
                status_message: Some("Task was not found; treated as already cancelled".into()),
                created_at: now.to_string(),
                last_updated_at: now.to_string(),
                ttl: None,
                poll_interval: None,
            });

        if !entry.status.is_terminal() {
            entry.status = TaskStatus::Cancelled;
            entry.status_message = Some("Cancelled by owner".into());
            entry.last_updated_at = now.to_string();
        }

        entry.clone()
    }

    /// Drop tasks past their TTL (measured from `created_at`), if any is set.
    #[allow(dead_code)]
    pub(super) fn evict_expired(&self, now_ms: i64, parse_epoch_ms: impl Fn(&str) -> Option<i64>) {
        self.tasks.retain(|_, task| match (task.ttl, parse_epoch_ms(&task.created_at)) {
            (Some(ttl), Some(created_ms)) => now_ms - created_ms < ttl as i64,
            _ => true,
        });
    }
}
