//! Core Client implementation for MCP communication
//!
//! This module contains the main `Client<T>`/`ClientInner<T>` pair and the
//! server-initiated request/notification dispatch table, providing:
//!
//! - Connection initialization and capability negotiation
//! - Routing of server-initiated requests (sampling, elicitation, roots, logging, tasks)
//!   to registered handlers
//! - Routing of server notifications (cancellation, list-changed) to registered handlers
//!
//! `Client<T>` is a thin `Arc<ClientInner<T>>` handle: cloning it is a refcount bump,
//! and all state that needs to be shared with the background message dispatcher
//! (spawned by `ProtocolClient`) lives behind atomics/mutexes on `ClientInner`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fluxmcp_protocol::jsonrpc::{JsonRpcNotification, JsonRpcRequest};
use fluxmcp_protocol::types::{
    ClientCapabilities as ProtocolClientCapabilities, InitializeResult as ProtocolInitializeResult,
    *,
};
use fluxmcp_protocol::{Error, PROTOCOL_VERSION, Result};
use fluxmcp_transport::Transport;

use super::config::InitializeResult;
use super::protocol::ProtocolClient;
use crate::{
    ClientCapabilities,
    handlers::{ApprovalHandler, ApprovalRegistry, HandlerRegistry},
    sampling::SamplingHandler,
};

/// Shared client state, held behind `Arc` so `Client<T>` clones are cheap and
/// the background dispatcher task can hold a `Weak` reference to reach back in.
pub(super) struct ClientInner<T: Transport> {
    pub(super) protocol: ProtocolClient<T>,
    pub(super) capabilities: ClientCapabilities,
    pub(super) initialized: AtomicBool,
    pub(super) sampling_handler: Mutex<Option<Arc<dyn SamplingHandler>>>,
    pub(super) handlers: Mutex<HandlerRegistry>,
    pub(super) approval_handler: Mutex<Option<Arc<dyn ApprovalHandler>>>,
    pub(super) approvals: ApprovalRegistry,
    #[cfg(feature = "mcp-tasks")]
    pub(super) tasks: super::tasks::TaskRegistry,
    pub(super) auth: tokio::sync::RwLock<Option<Arc<super::auth::AuthSession>>>,
}

impl<T: Transport> std::fmt::Debug for ClientInner<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInner")
            .field("capabilities", &self.capabilities)
            .field("initialized", &self.initialized.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// The core MCP client implementation.
///
/// `Client` provides a comprehensive interface for communicating with MCP servers,
/// supporting all protocol features including tools, prompts, resources, sampling,
/// elicitation, roots, logging, and the task polling lifecycle.
///
/// The client must be initialized before use by calling `initialize()` to perform
/// the MCP handshake and capability negotiation.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::Client;
/// use fluxmcp_transport::stdio::StdioTransport;
///
/// # async fn example() -> fluxmcp_protocol::Result<()> {
/// let client = Client::new(StdioTransport::new());
/// let init_result = client.initialize().await?;
/// println!("Connected to: {}", init_result.server_info.name);
///
/// let tools = client.list_tools().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client<T: Transport> {
    pub(super) inner: Arc<ClientInner<T>>,
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("inner", &self.inner).finish()
    }
}

impl<T: Transport + 'static> Client<T> {
    /// Create a new client with the specified transport and default capabilities.
    ///
    /// The client must be initialized before use by calling `initialize()`.
    pub fn new(transport: T) -> Self {
        Self::with_capabilities(transport, ClientCapabilities::default())
    }

    /// Create a new client with the specified transport and capabilities.
    pub fn with_capabilities(transport: T, capabilities: ClientCapabilities) -> Self {
        let inner = Arc::new(ClientInner {
            protocol: ProtocolClient::new(transport),
            capabilities,
            initialized: AtomicBool::new(false),
            sampling_handler: Mutex::new(None),
            handlers: Mutex::new(HandlerRegistry::new()),
            approval_handler: Mutex::new(None),
            approvals: ApprovalRegistry::new(),
            #[cfg(feature = "mcp-tasks")]
            tasks: super::tasks::TaskRegistry::new(),
            auth: tokio::sync::RwLock::new(None),
        });

        // The dispatcher's handler callbacks are synchronous, so each server
        // request/notification is handed off to a spawned task. A `Weak` back
        // reference avoids a reference cycle (Client -> protocol -> dispatcher
        // -> handler closure -> Client).
        let request_inner = Arc::downgrade(&inner);
        inner.protocol.dispatcher().set_request_handler(Arc::new(move |request| {
            if let Some(inner) = request_inner.upgrade() {
                tokio::spawn(Self::dispatch_request(inner, request));
            }
            Ok(())
        }));

        let notification_inner = Arc::downgrade(&inner);
        inner
            .protocol
            .dispatcher()
            .set_notification_handler(Arc::new(move |notification| {
                if let Some(inner) = notification_inner.upgrade() {
                    tokio::spawn(Self::dispatch_notification(inner, notification));
                }
                Ok(())
            }));

        Self { inner }
    }

    async fn dispatch_request(inner: Arc<ClientInner<T>>, request: JsonRpcRequest) {
        let id = request.id.clone();
        if let Err(e) = Self::handle_request(&inner, request).await {
            tracing::error!("Error handling server-initiated request: {}", e);
            let _ = inner
                .protocol
                .send_response(id, Err((-32603, e.to_string())))
                .await;
        }
    }

    async fn dispatch_notification(inner: Arc<ClientInner<T>>, notification: JsonRpcNotification) {
        if let Err(e) = Self::handle_notification(&inner, notification).await {
            tracing::error!("Error handling server notification: {}", e);
        }
    }

    /// Dispatch a single server-initiated request to the appropriate handler
    /// and send its JSON-RPC response.
    async fn handle_request(inner: &Arc<ClientInner<T>>, request: JsonRpcRequest) -> Result<()> {
        let id = request.id.clone();

        match request.method.as_str() {
            "ping" => {
                let result = PingResult::empty();
                let value = serde_json::to_value(result)
                    .map_err(|e| Error::protocol(format!("Failed to serialize ping result: {e}")))?;
                inner.protocol.send_response(id, Ok(value)).await
            }

            "roots/list" => {
                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .roots
                    .clone();
                let result = match handler {
                    Some(h) => h.handle_roots_request().await,
                    None => Ok(Vec::new()),
                };
                match result {
                    Ok(roots) => {
                        let value = serde_json::to_value(ListRootsResult {
                            roots,
                            _meta: None,
                        })
                        .map_err(|e| Error::protocol(format!("Failed to serialize roots: {e}")))?;
                        inner.protocol.send_response(id, Ok(value)).await
                    }
                    Err(e) => {
                        let jsonrpc_error = e.into_jsonrpc_error();
                        inner
                            .protocol
                            .send_response(id, Err((jsonrpc_error.code, jsonrpc_error.message)))
                            .await
                    }
                }
            }

            "sampling/createMessage" => {
                let handler = inner
                    .sampling_handler
                    .lock()
                    .expect("sampling_handler mutex poisoned")
                    .clone();

                let Some(handler) = handler else {
                    return inner
                        .protocol
                        .send_response(id, Err((-32601, "Sampling not supported".to_string())))
                        .await;
                };

                let params: CreateMessageRequest = serde_json::from_value(
                    request.params.unwrap_or(serde_json::Value::Null),
                )
                .map_err(|e| Error::protocol(format!("Invalid createMessage params: {e}")))?;

                match handler.handle_create_message(params).await {
                    Ok(mut result) => {
                        // The wire format always carries a stopReason; a handler that
                        // didn't set one defaults to endTurn rather than omitting it.
                        result.stop_reason =
                            Some(result.stop_reason.unwrap_or(StopReason::EndTurn));
                        let value = serde_json::to_value(result).map_err(|e| {
                            Error::protocol(format!("Failed to serialize sampling result: {e}"))
                        })?;
                        inner.protocol.send_response(id, Ok(value)).await
                    }
                    Err(e) => {
                        inner
                            .protocol
                            .send_response(id, Err((-32603, format!("Sampling handler error: {e}"))))
                            .await
                    }
                }
            }

            "elicitation/create" => {
                let elicit_request: ElicitRequest = serde_json::from_value(
                    request.params.unwrap_or(serde_json::Value::Null),
                )
                .map_err(|e| Error::protocol(format!("Invalid elicitation params: {e}")))?;

                let wrapped =
                    crate::handlers::ElicitationRequest::new(id.clone(), elicit_request);

                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .elicitation
                    .clone();
                let result = match handler {
                    Some(h) => h.handle_elicitation(wrapped).await,
                    None => Err(crate::handlers::HandlerError::Configuration {
                        message: "No elicitation handler registered".to_string(),
                    }),
                };

                match result {
                    Ok(response) => {
                        let value = serde_json::to_value(response.into_protocol()).map_err(|e| {
                            Error::protocol(format!(
                                "Failed to serialize elicitation response: {e}"
                            ))
                        })?;
                        inner.protocol.send_response(id, Ok(value)).await
                    }
                    Err(e) => {
                        let jsonrpc_error = e.into_jsonrpc_error();
                        inner
                            .protocol
                            .send_response(id, Err((jsonrpc_error.code, jsonrpc_error.message)))
                            .await
                    }
                }
            }

            "logging/setLevel" => {
                let handlers = inner.handlers.lock().expect("handlers mutex poisoned");
                let has_handler = handlers.has_log_handler();
                drop(handlers);

                if has_handler {
                    let value = serde_json::to_value(SetLevelResult).map_err(|e| {
                        Error::protocol(format!("Failed to serialize setLevel result: {e}"))
                    })?;
                    inner.protocol.send_response(id, Ok(value)).await
                } else {
                    inner
                        .protocol
                        .send_response(
                            id,
                            Err((-32601, "Logging control not supported".to_string())),
                        )
                        .await
                }
            }

            #[cfg(feature = "mcp-tasks")]
            "tasks/get" => {
                let params: fluxmcp_protocol::types::tasks::GetTaskRequest = serde_json::from_value(
                    request.params.unwrap_or(serde_json::Value::Null),
                )
                .map_err(|e| Error::protocol(format!("Invalid tasks/get params: {e}")))?;

                match inner.tasks.get(&params.task_id) {
                    Some(task) => {
                        let value = serde_json::to_value(task).map_err(|e| {
                            Error::protocol(format!("Failed to serialize task: {e}"))
                        })?;
                        inner.protocol.send_response(id, Ok(value)).await
                    }
                    None => {
                        inner
                            .protocol
                            .send_response(
                                id,
                                Err((-32602, format!("Unknown task id: {}", params.task_id))),
                            )
                            .await
                    }
                }
            }

            #[cfg(feature = "mcp-tasks")]
            "tasks/list" => {
                let params: fluxmcp_protocol::types::tasks::ListTasksRequest =
                    serde_json::from_value(request.params.unwrap_or(serde_json::Value::Null))
                        .map_err(|e| Error::protocol(format!("Invalid tasks/list params: {e}")))?;

                let result = inner.tasks.list(params.cursor.as_deref(), params.limit);
                let value = serde_json::to_value(result)
                    .map_err(|e| Error::protocol(format!("Failed to serialize task list: {e}")))?;
                inner.protocol.send_response(id, Ok(value)).await
            }

            #[cfg(feature = "mcp-tasks")]
            "tasks/cancel" => {
                let params: fluxmcp_protocol::types::tasks::CancelTaskRequest =
                    serde_json::from_value(request.params.unwrap_or(serde_json::Value::Null))
                        .map_err(|e| Error::protocol(format!("Invalid tasks/cancel params: {e}")))?;

                let now = chrono::Utc::now().to_rfc3339();
                let task = inner.tasks.cancel(&params.task_id, &now);
                let value = serde_json::to_value(task)
                    .map_err(|e| Error::protocol(format!("Failed to serialize task: {e}")))?;
                inner.protocol.send_response(id, Ok(value)).await
            }

            other => {
                inner
                    .protocol
                    .send_response(id, Err((-32601, format!("Method not found: {other}"))))
                    .await
            }
        }
    }

    /// Dispatch a server notification to its registered handler, if any.
    async fn handle_notification(
        inner: &Arc<ClientInner<T>>,
        notification: JsonRpcNotification,
    ) -> Result<()> {
        let params = notification.params.unwrap_or(serde_json::Value::Null);

        match notification.method.as_str() {
            "notifications/message" => {
                let log: LoggingNotification = serde_json::from_value(params)
                    .map_err(|e| Error::protocol(format!("Invalid log notification: {e}")))?;
                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .log
                    .clone();
                if let Some(handler) = handler {
                    handler
                        .handle_log(log)
                        .await
                        .map_err(|e| Error::protocol(format!("Log handler error: {e}")))?;
                }
                Ok(())
            }

            "notifications/resources/updated" => {
                let update: ResourceUpdatedNotification = serde_json::from_value(params)
                    .map_err(|e| Error::protocol(format!("Invalid resource update: {e}")))?;
                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .resource_update
                    .clone();
                if let Some(handler) = handler {
                    handler.handle_resource_update(update).await.map_err(|e| {
                        Error::protocol(format!("Resource update handler error: {e}"))
                    })?;
                }
                Ok(())
            }

            "notifications/cancelled" => {
                let cancelled: CancelledNotification = serde_json::from_value(params)
                    .map_err(|e| Error::protocol(format!("Invalid cancellation: {e}")))?;
                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .get_cancellation_handler();
                if let Some(handler) = handler {
                    handler.handle_cancellation(cancelled).await.map_err(|e| {
                        Error::protocol(format!("Cancellation handler error: {e}"))
                    })?;
                }
                Ok(())
            }

            "notifications/resources/list_changed" => {
                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .get_resource_list_changed_handler();
                if let Some(handler) = handler {
                    handler.handle_resource_list_changed().await.map_err(|e| {
                        Error::protocol(format!("Resource list changed handler error: {e}"))
                    })?;
                }
                Ok(())
            }

            "notifications/prompts/list_changed" => {
                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .get_prompt_list_changed_handler();
                if let Some(handler) = handler {
                    handler.handle_prompt_list_changed().await.map_err(|e| {
                        Error::protocol(format!("Prompt list changed handler error: {e}"))
                    })?;
                }
                Ok(())
            }

            "notifications/tools/list_changed" => {
                let handler = inner
                    .handlers
                    .lock()
                    .expect("handlers mutex poisoned")
                    .get_tool_list_changed_handler();
                if let Some(handler) = handler {
                    handler.handle_tool_list_changed().await.map_err(|e| {
                        Error::protocol(format!("Tool list changed handler error: {e}"))
                    })?;
                }
                Ok(())
            }

            #[cfg(feature = "mcp-tasks")]
            "notifications/tasks/status" => {
                let status: fluxmcp_protocol::types::tasks::TaskStatusNotification =
                    serde_json::from_value(params)
                        .map_err(|e| Error::protocol(format!("Invalid task status: {e}")))?;
                tracing::debug!("Task {} status: {:?}", status.task_id, status.status);
                Ok(())
            }

            other => {
                tracing::debug!("Ignoring unhandled notification: {}", other);
                Ok(())
            }
        }
    }

    /// Initialize the connection with the MCP server.
    ///
    /// Performs the initialization handshake, negotiating capabilities that
    /// were auto-detected from registered handlers.
    pub async fn initialize(&self) -> Result<InitializeResult> {
        let mut client_caps = ProtocolClientCapabilities::default();

        if let Some(sampling_caps) = self.get_sampling_capabilities() {
            client_caps.sampling = Some(sampling_caps);
        }
        if let Some(elicitation_caps) = self.get_elicitation_capabilities() {
            client_caps.elicitation = Some(elicitation_caps);
        }
        if let Some(roots_caps) = self.get_roots_capabilities() {
            client_caps.roots = Some(roots_caps);
        }

        let request = InitializeRequest {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: client_caps,
            client_info: fluxmcp_protocol::Implementation {
                name: "fluxmcp-client".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("FluxMCP Client".to_string()),
            },
            _meta: None,
        };

        let protocol_response: ProtocolInitializeResult = self
            .inner
            .protocol
            .request("initialize", Some(serde_json::to_value(request)?))
            .await?;
        self.inner.initialized.store(true, Ordering::Relaxed);

        self.inner
            .protocol
            .notify("notifications/initialized", None)
            .await?;

        Ok(InitializeResult {
            server_info: protocol_response.server_info,
            server_capabilities: protocol_response.capabilities,
        })
    }

    /// Subscribe to resource change notifications for the given URI.
    pub async fn subscribe(&self, uri: &str) -> Result<EmptyResult> {
        if !self.inner.initialized.load(Ordering::Relaxed) {
            return Err(Error::bad_request("Client not initialized"));
        }
        if uri.is_empty() {
            return Err(Error::bad_request("Subscription URI cannot be empty"));
        }

        let request = SubscribeRequest {
            uri: uri.to_string(),
        };
        self.inner
            .protocol
            .request(
                "resources/subscribe",
                Some(serde_json::to_value(request).map_err(|e| {
                    Error::protocol(format!("Failed to serialize subscribe request: {e}"))
                })?),
            )
            .await
    }

    /// Unsubscribe from resource change notifications for the given URI.
    pub async fn unsubscribe(&self, uri: &str) -> Result<EmptyResult> {
        if !self.inner.initialized.load(Ordering::Relaxed) {
            return Err(Error::bad_request("Client not initialized"));
        }
        if uri.is_empty() {
            return Err(Error::bad_request("Unsubscription URI cannot be empty"));
        }

        let request = UnsubscribeRequest {
            uri: uri.to_string(),
        };
        self.inner
            .protocol
            .request(
                "resources/unsubscribe",
                Some(serde_json::to_value(request).map_err(|e| {
                    Error::protocol(format!("Failed to serialize unsubscribe request: {e}"))
                })?),
            )
            .await
    }

    /// Get the client's negotiated capability configuration.
    pub fn capabilities(&self) -> &ClientCapabilities {
        &self.inner.capabilities
    }

    /// Disconnect the transport and stop the background message dispatcher.
    pub async fn disconnect(&self) -> Result<()> {
        self.inner.protocol.disconnect().await
    }

    fn get_elicitation_capabilities(&self) -> Option<ElicitationCapabilities> {
        if self.has_elicitation_handler() {
            Some(ElicitationCapabilities::default())
        } else {
            None
        }
    }

    fn get_roots_capabilities(&self) -> Option<RootsCapabilities> {
        if self.has_roots_handler() {
            Some(RootsCapabilities {
                list_changed: Some(true),
            })
        } else {
            None
        }
    }
}
