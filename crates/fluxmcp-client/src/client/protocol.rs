//! Protocol client for JSON-RPC communication
//!
//! This module provides the `ProtocolClient`, which handles request/response
//! correlation, serialization, and protocol-level concerns. Every outbound
//! request is registered with a background [`MessageDispatcher`](super::dispatcher::MessageDispatcher)
//! *before* it is sent, so the dispatcher's single `transport.receive()` loop can
//! route the eventual response back to the right caller - this is what makes
//! server-initiated requests (sampling, elicitation, roots, tasks) and
//! client-initiated requests safe to interleave on the same transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fluxmcp_protocol::jsonrpc::{JsonRpcNotification, JsonRpcRequest, JsonRpcVersion};
use fluxmcp_protocol::{Error, Result};
use fluxmcp_transport::{Transport, TransportMessage};

use super::dispatcher::MessageDispatcher;

/// Default request timeout used when a caller doesn't override it.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// JSON-RPC protocol handler for MCP communication.
///
/// Wraps the transport in an `Arc` so it can be shared with the dispatcher's
/// background routing task, and owns the `next_id` counter used to generate
/// unique request ids.
#[derive(Debug)]
pub(super) struct ProtocolClient<T: Transport> {
    transport: Arc<T>,
    dispatcher: Arc<MessageDispatcher>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl<T: Transport + 'static> ProtocolClient<T> {
    pub(super) fn new(transport: T) -> Self {
        Self::with_timeout(transport, Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS))
    }

    pub(super) fn with_timeout(transport: T, timeout: Duration) -> Self {
        let transport = Arc::new(transport);
        let dispatcher = MessageDispatcher::new(Arc::clone(&transport));
        Self {
            transport,
            dispatcher,
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    pub(super) fn dispatcher(&self) -> &Arc<MessageDispatcher> {
        &self.dispatcher
    }

    /// Send a JSON-RPC request and await the correlated response.
    ///
    /// Registers the call with the dispatcher before sending, so a response
    /// racing ahead of this function's own await can never be missed.
    pub(super) async fn request<R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<R> {
        let id_num = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = fluxmcp_protocol::MessageId::from(id_num.to_string());

        let request = JsonRpcRequest {
            jsonrpc: JsonRpcVersion,
            id: id.clone(),
            method: method.to_string(),
            params,
        };

        let mut call = self.dispatcher.register_call(id.clone(), method);

        let payload = serde_json::to_vec(&request)
            .map_err(|e| Error::protocol(format!("Failed to serialize request: {e}")))?;
        let message = TransportMessage::new(id.clone(), payload.into());

        if let Err(e) = self.transport.send(message).await {
            self.dispatcher.forget_call(&id);
            return Err(Error::transport(format!("Transport send failed: {e}")));
        }

        let response = match tokio::time::timeout(self.timeout, &mut call.rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                return Err(Error::protocol(format!(
                    "Dispatcher dropped response channel for method {method}"
                )));
            }
            Err(_) => {
                call.cancel();
                self.dispatcher.forget_call(&id);
                return Err(Error::timeout(format!(
                    "Request {method} (id {id}) timed out after {:?}",
                    self.timeout
                )));
            }
        };

        if let Some(error) = response.error() {
            return Err(Error::rpc(error.code, &error.message));
        }

        serde_json::from_value(response.result().unwrap_or_default().clone())
            .map_err(|e| Error::protocol(format!("Failed to deserialize response: {e}")))
    }

    /// Send a JSON-RPC notification (no response expected, no correlation needed).
    pub(super) async fn notify(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<()> {
        let notification = JsonRpcNotification {
            jsonrpc: JsonRpcVersion,
            method: method.to_string(),
            params,
        };

        let payload = serde_json::to_vec(&notification)
            .map_err(|e| Error::protocol(format!("Failed to serialize notification: {e}")))?;

        let message = TransportMessage::new(
            fluxmcp_protocol::MessageId::from(format!("notif-{}", self.next_id.fetch_add(1, Ordering::Relaxed))),
            payload.into(),
        );

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::transport(format!("Transport send failed: {e}")))
    }

    /// Connect the transport.
    pub(super) async fn connect(&self) -> Result<()> {
        self.transport
            .connect()
            .await
            .map_err(|e| Error::transport(format!("Transport connect failed: {e}")))
    }

    /// Disconnect the transport and stop the dispatcher's routing task.
    pub(super) async fn disconnect(&self) -> Result<()> {
        self.dispatcher.shutdown();
        self.transport
            .disconnect()
            .await
            .map_err(|e| Error::transport(format!("Transport disconnect failed: {e}")))
    }

    /// Send a JSON-RPC response for a server-initiated request.
    pub(super) async fn send_response(
        &self,
        id: fluxmcp_protocol::MessageId,
        result: std::result::Result<serde_json::Value, (i32, String)>,
    ) -> Result<()> {
        use fluxmcp_protocol::jsonrpc::{JsonRpcError, JsonRpcResponse};

        let response = match result {
            Ok(value) => JsonRpcResponse::success(value, id.clone()),
            Err((code, message)) => JsonRpcResponse::error_response(
                JsonRpcError {
                    code,
                    message,
                    data: None,
                },
                id.clone(),
            ),
        };

        let payload = serde_json::to_vec(&response)
            .map_err(|e| Error::protocol(format!("Failed to serialize response: {e}")))?;

        let message = TransportMessage::new(id, payload.into());

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::transport(format!("Transport send failed: {e}")))
    }

    /// Get the underlying transport reference.
    pub(super) fn transport(&self) -> &Arc<T> {
        &self.transport
    }
}
