//! Handler traits for bidirectional communication in MCP client
//!
//! This module provides handler traits and registration mechanisms for processing
//! server-initiated requests. The MCP protocol is bidirectional, meaning servers
//! can also send requests to clients for various purposes like elicitation,
//! logging, and resource updates.
//!
//! ## Handler Types
//!
//! - **ElicitationHandler**: Handle user input requests from servers
//! - **LogHandler**: Route server log messages to client logging systems
//! - **ResourceUpdateHandler**: Handle notifications when resources change
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fluxmcp_client::handlers::{ElicitationHandler, ElicitationRequest, ElicitationResponse, ElicitationAction, HandlerError};
//! use async_trait::async_trait;
//!
//! // Implement elicitation handler
//! #[derive(Debug)]
//! struct MyElicitationHandler;
//!
//! #[async_trait]
//! impl ElicitationHandler for MyElicitationHandler {
//!     async fn handle_elicitation(
//!         &self,
//!         request: ElicitationRequest,
//!     ) -> Result<ElicitationResponse, HandlerError> {
//!         // Display the prompt to the user
//!         eprintln!("\n{}", request.message());
//!         eprintln!("---");
//!
//!         // Access the typed schema (not serde_json::Value!)
//!         let mut content = std::collections::HashMap::new();
//!         if let Some(schema) = request.schema() {
//!             for (field_name, field_def) in &schema.properties {
//!                 eprint!("{}: ", field_name);
//!
//!                 let mut input = String::new();
//!                 std::io::stdin().read_line(&mut input)
//!                     .map_err(|e| HandlerError::Generic {
//!                         message: e.to_string()
//!                     })?;
//!
//!                 let input = input.trim();
//!
//!                 // Parse input based on field type (from typed schema!)
//!                 use fluxmcp_protocol::types::PrimitiveSchemaDefinition;
//!                 let value: serde_json::Value = match field_def {
//!                     PrimitiveSchemaDefinition::Boolean { .. } => {
//!                         serde_json::json!(input == "true" || input == "yes" || input == "1")
//!                     }
//!                     PrimitiveSchemaDefinition::Number { .. } | PrimitiveSchemaDefinition::Integer { .. } => {
//!                         input.parse::<f64>()
//!                             .map(|n| serde_json::json!(n))
//!                             .unwrap_or_else(|_| serde_json::json!(input))
//!                     }
//!                     _ => serde_json::json!(input),
//!                 };
//!
//!                 content.insert(field_name.clone(), value);
//!             }
//!         }
//!
//!         Ok(ElicitationResponse::accept(content))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use fluxmcp_protocol::MessageId;
use fluxmcp_protocol::jsonrpc::JsonRpcError;
use fluxmcp_protocol::types::LogLevel;

// Re-export MCP protocol notification types directly (MCP spec compliance)
pub use fluxmcp_protocol::types::{
    CancelledNotification,       // MCP 2025-06-18 spec
    LoggingNotification,         // MCP 2025-06-18 spec
    ResourceUpdatedNotification, // MCP 2025-06-18 spec
};

// ============================================================================
// ERROR TYPES FOR HANDLER OPERATIONS
// ============================================================================

/// Errors that can occur during handler operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HandlerError {
    /// Handler operation failed due to user cancellation
    #[error("User cancelled the operation")]
    UserCancelled,

    /// Handler operation timed out
    #[error("Handler operation timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Input validation failed
    #[error("Invalid input: {details}")]
    InvalidInput { details: String },

    /// Handler configuration error
    #[error("Handler configuration error: {message}")]
    Configuration { message: String },

    /// Generic handler error
    #[error("Handler error: {message}")]
    Generic { message: String },

    /// External system error (e.g., UI framework, database)
    #[error("External system error: {source}")]
    External {
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl HandlerError {
    /// Convert handler error to JSON-RPC error
    ///
    /// This method centralizes the mapping between handler errors and
    /// JSON-RPC error codes, ensuring consistency across all handlers.
    ///
    /// # Error Code Mapping
    ///
    /// - **-1**: User rejected sampling request (MCP 2025-06-18 spec)
    /// - **-32801**: Handler operation timed out
    /// - **-32602**: Invalid input (bad request)
    /// - **-32601**: Handler configuration error (method not found)
    /// - **-32603**: Generic/external handler error (internal error)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fluxmcp_client::handlers::HandlerError;
    ///
    /// let error = HandlerError::UserCancelled;
    /// let jsonrpc_error = error.into_jsonrpc_error();
    /// assert_eq!(jsonrpc_error.code, -1);
    /// assert!(jsonrpc_error.message.contains("User rejected"));
    /// ```
    #[must_use]
    pub fn into_jsonrpc_error(&self) -> JsonRpcError {
        let (code, message) = match self {
            HandlerError::UserCancelled => (-1, "User rejected sampling request".to_string()),
            HandlerError::Timeout { timeout_seconds } => (
                -32801,
                format!(
                    "Handler operation timed out after {} seconds",
                    timeout_seconds
                ),
            ),
            HandlerError::InvalidInput { details } => {
                (-32602, format!("Invalid input: {}", details))
            }
            HandlerError::Configuration { message } => {
                (-32601, format!("Handler configuration error: {}", message))
            }
            HandlerError::Generic { message } => (-32603, format!("Handler error: {}", message)),
            HandlerError::External { source } => {
                (-32603, format!("External system error: {}", source))
            }
        };

        JsonRpcError {
            code,
            message,
            data: None,
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;

// ============================================================================
// ELICITATION HANDLER TRAIT
// ============================================================================

/// Ergonomic wrapper around protocol ElicitRequest with request ID
///
/// This type wraps the protocol-level `ElicitRequest` and adds the request ID
/// from the JSON-RPC envelope. It provides ergonomic accessors while preserving
/// full type safety from the protocol layer.
///
/// # Design Philosophy
///
/// Rather than duplicating protocol types, we wrap them. This ensures:
/// - Type safety is preserved (ElicitationSchema stays typed!)
/// - No data loss (Duration instead of lossy integer seconds)
/// - Single source of truth (protocol crate defines MCP types)
/// - Automatic sync (protocol changes propagate automatically)
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::ElicitationRequest;
///
/// async fn handle(request: ElicitationRequest) {
///     // Access request ID
///     println!("ID: {:?}", request.id());
///
///     // Access message
///     println!("Message: {}", request.message());
///
///     // Access typed schema (not Value!)
///     if let Some(schema) = request.schema() {
///         for (name, property) in &schema.properties {
///             println!("Field: {}", name);
///         }
///     }
///
///     // Access timeout as Duration
///     if let Some(timeout) = request.timeout() {
///         println!("Timeout: {:?}", timeout);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ElicitationRequest {
    id: MessageId,
    inner: fluxmcp_protocol::types::ElicitRequest,
}

impl ElicitationRequest {
    /// Create a new elicitation request wrapper
    ///
    /// # Arguments
    ///
    /// * `id` - Request ID from JSON-RPC envelope
    /// * `request` - Protocol-level elicit request
    #[must_use]
    pub fn new(id: MessageId, request: fluxmcp_protocol::types::ElicitRequest) -> Self {
        Self { id, inner: request }
    }

    /// Get request ID from JSON-RPC envelope
    #[must_use]
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Get human-readable message for the user
    ///
    /// This is the primary prompt/question being asked of the user.
    #[must_use]
    pub fn message(&self) -> &str {
        self.inner.params.message()
    }

    /// Get schema defining expected response structure
    ///
    /// Returns the typed `ElicitationSchema` which provides:
    /// - Type-safe access to properties
    /// - Required field information
    /// - Validation constraints
    ///
    /// # Note
    ///
    /// This returns a TYPED schema, not `serde_json::Value`.
    /// You can inspect the schema structure type-safely:
    ///
    /// ```rust,no_run
    /// # use fluxmcp_client::handlers::ElicitationRequest;
    /// # use fluxmcp_protocol::types::PrimitiveSchemaDefinition;
    /// # async fn example(request: ElicitationRequest) {
    /// if let Some(schema) = request.schema() {
    ///     for (name, definition) in &schema.properties {
    ///         match definition {
    ///             PrimitiveSchemaDefinition::String { description, .. } => {
    ///                 println!("String field: {}", name);
    ///             }
    ///             PrimitiveSchemaDefinition::Number { minimum, maximum, .. } => {
    ///                 println!("Number field: {} ({:?}-{:?})", name, minimum, maximum);
    ///             }
    ///             _ => {}
    ///         }
    ///     }
    /// }
    /// # }
    /// ```
    #[must_use]
    pub fn schema(&self) -> Option<&fluxmcp_protocol::types::ElicitationSchema> {
        #[allow(unreachable_patterns)]
        match &self.inner.params {
            fluxmcp_protocol::types::ElicitRequestParams::Form(form) => Some(&form.schema),
            _ => None, // URL elicitation (when mcp-url-elicitation feature is enabled)
        }
    }

    /// Get optional timeout as Duration
    ///
    /// Converts milliseconds from the protocol to ergonomic `Duration` type.
    /// No data loss occurs (unlike converting to integer seconds).
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        #[allow(unreachable_patterns)]
        match &self.inner.params {
            fluxmcp_protocol::types::ElicitRequestParams::Form(form) => {
                form.timeout_ms.map(|ms| Duration::from_millis(ms as u64))
            }
            _ => None, // URL elicitation (when mcp-url-elicitation feature is enabled)
        }
    }

    /// Check if request can be cancelled by the user
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        #[allow(unreachable_patterns)]
        match &self.inner.params {
            fluxmcp_protocol::types::ElicitRequestParams::Form(form) => {
                form.cancellable.unwrap_or(false)
            }
            _ => false, // URL elicitation (when mcp-url-elicitation feature is enabled)
        }
    }

    /// Get access to underlying protocol request if needed
    ///
    /// For advanced use cases where you need the raw protocol type.
    #[must_use]
    pub fn as_protocol(&self) -> &fluxmcp_protocol::types::ElicitRequest {
        &self.inner
    }

    /// Consume wrapper and return protocol request
    #[must_use]
    pub fn into_protocol(self) -> fluxmcp_protocol::types::ElicitRequest {
        self.inner
    }
}

// Re-export protocol action enum (no need to duplicate)
pub use fluxmcp_protocol::types::ElicitationAction;

/// Elicitation response builder
///
/// Wrapper around protocol `ElicitResult` with ergonomic factory methods.
///
/// # Examples
///
/// ```rust
/// use fluxmcp_client::handlers::ElicitationResponse;
/// use std::collections::HashMap;
///
/// // Accept with content
/// let mut content = HashMap::new();
/// content.insert("name".to_string(), serde_json::json!("Alice"));
/// let response = ElicitationResponse::accept(content);
///
/// // Decline
/// let response = ElicitationResponse::decline();
///
/// // Cancel
/// let response = ElicitationResponse::cancel();
/// ```
#[derive(Debug, Clone)]
pub struct ElicitationResponse {
    inner: fluxmcp_protocol::types::ElicitResult,
}

impl ElicitationResponse {
    /// Create response with accept action and user content
    ///
    /// # Arguments
    ///
    /// * `content` - User-submitted data conforming to the request schema
    #[must_use]
    pub fn accept(content: HashMap<String, serde_json::Value>) -> Self {
        Self {
            inner: fluxmcp_protocol::types::ElicitResult {
                action: ElicitationAction::Accept,
                content: Some(content),
                _meta: None,
            },
        }
    }

    /// Create response with decline action (user explicitly declined)
    #[must_use]
    pub fn decline() -> Self {
        Self {
            inner: fluxmcp_protocol::types::ElicitResult {
                action: ElicitationAction::Decline,
                content: None,
                _meta: None,
            },
        }
    }

    /// Create response with cancel action (user dismissed without choice)
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            inner: fluxmcp_protocol::types::ElicitResult {
                action: ElicitationAction::Cancel,
                content: None,
                _meta: None,
            },
        }
    }

    /// Get the action from this response
    #[must_use]
    pub fn action(&self) -> ElicitationAction {
        self.inner.action
    }

    /// Get the content from this response
    #[must_use]
    pub fn content(&self) -> Option<&HashMap<String, serde_json::Value>> {
        self.inner.content.as_ref()
    }

    /// Convert to protocol type for sending over the wire
    pub(crate) fn into_protocol(self) -> fluxmcp_protocol::types::ElicitResult {
        self.inner
    }
}

/// Handler for server-initiated elicitation requests
///
/// Elicitation is a mechanism where servers can request user input during
/// operations. For example, a server might need user preferences, authentication
/// credentials, or configuration choices to complete a task.
///
/// Implementations should:
/// - Present the schema/prompt to the user in an appropriate UI
/// - Validate user input against the provided schema
/// - Handle user cancellation gracefully
/// - Respect timeout constraints
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{ElicitationAction, ElicitationHandler, ElicitationRequest, ElicitationResponse, HandlerResult};
/// use async_trait::async_trait;
/// use serde_json::json;
///
/// #[derive(Debug)]
/// struct CLIElicitationHandler;
///
/// #[async_trait]
/// impl ElicitationHandler for CLIElicitationHandler {
///     async fn handle_elicitation(
///         &self,
///         request: ElicitationRequest,
///     ) -> HandlerResult<ElicitationResponse> {
///         println!("Server request: {}", request.message());
///
///         // In a real implementation, you would:
///         // 1. Inspect the typed schema to understand what input is needed
///         // 2. Present an appropriate UI (CLI prompts, GUI forms, etc.)
///         // 3. Validate the user's input against the schema
///         // 4. Return the structured response
///
///         let mut content = std::collections::HashMap::new();
///         content.insert("user_choice".to_string(), json!("example_value"));
///         Ok(ElicitationResponse::accept(content))
///     }
/// }
/// ```
#[async_trait]
pub trait ElicitationHandler: Send + Sync + std::fmt::Debug {
    /// Handle an elicitation request from the server
    ///
    /// This method is called when a server needs user input. The implementation
    /// should present the request to the user and collect their response.
    ///
    /// # Arguments
    ///
    /// * `request` - The elicitation request containing prompt, schema, and metadata
    ///
    /// # Returns
    ///
    /// Returns the user's response or an error if the operation failed.
    async fn handle_elicitation(
        &self,
        request: ElicitationRequest,
    ) -> HandlerResult<ElicitationResponse>;
}

// ============================================================================

// ============================================================================
// LOG HANDLER TRAIT
// ============================================================================

// LoggingNotification is re-exported from protocol (see imports above)
// This ensures MCP 2025-06-18 spec compliance

/// Handler for server log messages
///
/// Log handlers receive log messages from the server and can route them to
/// the client's logging system. This is useful for debugging, monitoring,
/// and maintaining a unified log across client and server.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{LogHandler, LoggingNotification, HandlerResult};
/// use fluxmcp_protocol::types::LogLevel;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct TraceLogHandler;
///
/// #[async_trait]
/// impl LogHandler for TraceLogHandler {
///     async fn handle_log(&self, log: LoggingNotification) -> HandlerResult<()> {
///         // MCP spec: data can be any JSON type (string, object, etc.)
///         let message = log.data.to_string();
///         match log.level {
///             LogLevel::Error => tracing::error!("Server: {}", message),
///             LogLevel::Warning => tracing::warn!("Server: {}", message),
///             LogLevel::Info => tracing::info!("Server: {}", message),
///             LogLevel::Debug => tracing::debug!("Server: {}", message),
///             LogLevel::Notice => tracing::info!("Server: {}", message),
///             LogLevel::Critical => tracing::error!("Server CRITICAL: {}", message),
///             LogLevel::Alert => tracing::error!("Server ALERT: {}", message),
///             LogLevel::Emergency => tracing::error!("Server EMERGENCY: {}", message),
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait LogHandler: Send + Sync + std::fmt::Debug {
    /// Handle a log message from the server
    ///
    /// This method is called when the server sends log messages to the client.
    /// Implementations can route these to the client's logging system.
    ///
    /// # Arguments
    ///
    /// * `log` - The log notification with level and data (per MCP 2025-06-18 spec)
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the log message was processed successfully.
    async fn handle_log(&self, log: LoggingNotification) -> HandlerResult<()>;
}

// ============================================================================
// RESOURCE UPDATE HANDLER TRAIT
// ============================================================================

// ResourceUpdatedNotification is re-exported from protocol (see imports above)
// This ensures MCP 2025-06-18 spec compliance
//
// Per MCP spec: This notification ONLY contains the URI of the changed resource.
// Clients must call resources/read to get the updated content.

/// Handler for resource update notifications
///
/// Resource update handlers receive notifications when resources that the
/// client has subscribed to are modified. This enables reactive updates
/// to cached data or UI refreshes when server-side resources change.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{ResourceUpdateHandler, ResourceUpdatedNotification, HandlerResult};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct CacheInvalidationHandler;
///
/// #[async_trait]
/// impl ResourceUpdateHandler for CacheInvalidationHandler {
///     async fn handle_resource_update(
///         &self,
///         notification: ResourceUpdatedNotification,
///     ) -> HandlerResult<()> {
///         // Per MCP spec: notification only contains URI
///         // Client must call resources/read to get updated content
///         println!("Resource {} was updated", notification.uri);
///
///         // In a real implementation, you might:
///         // - Invalidate cached data for this resource
///         // - Refresh UI components that display this resource
///         // - Log the change for audit purposes
///         // - Trigger dependent computations
///         
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ResourceUpdateHandler: Send + Sync + std::fmt::Debug {
    /// Handle a resource update notification
    ///
    /// This method is called when a subscribed resource changes on the server.
    ///
    /// # Arguments
    ///
    /// * `notification` - Information about the resource change
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the notification was processed successfully.
    async fn handle_resource_update(
        &self,
        notification: ResourceUpdatedNotification,
    ) -> HandlerResult<()>;
}

// ============================================================================
// ROOTS HANDLER TRAIT
// ============================================================================

/// Roots handler for responding to server requests for filesystem roots
///
/// Per MCP 2025-06-18 specification, `roots/list` is a SERVER->CLIENT request.
/// Servers ask clients what filesystem roots (directories/files) they have access to.
/// This is commonly used when servers need to understand their operating boundaries,
/// such as which repositories or project directories they can access.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{RootsHandler, HandlerResult};
/// use fluxmcp_protocol::types::Root;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyRootsHandler {
///     project_dirs: Vec<String>,
/// }
///
/// #[async_trait]
/// impl RootsHandler for MyRootsHandler {
///     async fn handle_roots_request(&self) -> HandlerResult<Vec<Root>> {
///         Ok(self.project_dirs
///             .iter()
///             .map(|dir| Root {
///                 uri: format!("file://{}", dir).into(),
///                 name: Some(dir.split('/').last().unwrap_or("").to_string()),
///             })
///             .collect())
///     }
/// }
/// ```
#[async_trait]
pub trait RootsHandler: Send + Sync + std::fmt::Debug {
    /// Handle a roots/list request from the server
    ///
    /// This method is called when the server wants to know which filesystem roots
    /// the client has available. The implementation should return a list of Root
    /// objects representing directories or files the server can operate on.
    ///
    /// # Returns
    ///
    /// Returns a vector of Root objects, each with a URI (must start with file://)
    /// and optional human-readable name.
    ///
    /// # Note
    ///
    /// Per MCP specification, URIs must start with `file://` for now. This restriction
    /// may be relaxed in future protocol versions.
    async fn handle_roots_request(&self) -> HandlerResult<Vec<fluxmcp_protocol::types::Root>>;
}

// ============================================================================
// CANCELLATION HANDLER TRAIT
// ============================================================================

/// Cancellation handler for processing cancellation notifications
///
/// Per MCP 2025-06-18 specification, `notifications/cancelled` can be sent by
/// either side to indicate cancellation of a previously-issued request.
///
/// When the server sends a cancellation notification, it indicates that a request
/// the client sent is being cancelled and the result will be unused. The client
/// SHOULD cease any associated processing.
///
/// # MCP Specification
///
/// From the MCP spec:
/// - "The request SHOULD still be in-flight, but due to communication latency,
///    it is always possible that this notification MAY arrive after the request
///    has already finished."
/// - "A client MUST NOT attempt to cancel its `initialize` request."
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{CancellationHandler, CancelledNotification, HandlerResult};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyCancellationHandler;
///
/// #[async_trait]
/// impl CancellationHandler for MyCancellationHandler {
///     async fn handle_cancellation(&self, notification: CancelledNotification) -> HandlerResult<()> {
///         println!("Request {} was cancelled", notification.request_id);
///         if let Some(reason) = &notification.reason {
///             println!("Reason: {}", reason);
///         }
///
///         // In a real implementation:
///         // - Look up the in-flight request by notification.request_id
///         // - Signal cancellation (e.g., via CancellationToken)
///         // - Clean up any resources
///
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait CancellationHandler: Send + Sync + std::fmt::Debug {
    /// Handle a cancellation notification
    ///
    /// This method is called when the server cancels a request that the client
    /// previously issued.
    ///
    /// # Arguments
    ///
    /// * `notification` - The cancellation notification containing request ID and optional reason
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the cancellation was processed successfully.
    async fn handle_cancellation(&self, notification: CancelledNotification) -> HandlerResult<()>;
}

// ============================================================================
// LIST CHANGED HANDLER TRAITS
// ============================================================================

/// Handler for resource list changes
///
/// Per MCP 2025-06-18 specification, `notifications/resources/list_changed` is
/// an optional notification from the server to the client, informing it that the
/// list of resources it can read from has changed.
///
/// This notification has no parameters - it simply signals that the client should
/// re-query the server's resource list if needed.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{ResourceListChangedHandler, HandlerResult};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyResourceListHandler;
///
/// #[async_trait]
/// impl ResourceListChangedHandler for MyResourceListHandler {
///     async fn handle_resource_list_changed(&self) -> HandlerResult<()> {
///         println!("Server's resource list changed - refreshing...");
///         // In a real implementation, re-query: client.list_resources().await
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ResourceListChangedHandler: Send + Sync + std::fmt::Debug {
    /// Handle a resource list changed notification
    ///
    /// This method is called when the server's available resource list changes.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the notification was processed successfully.
    async fn handle_resource_list_changed(&self) -> HandlerResult<()>;
}

/// Handler for prompt list changes
///
/// Per MCP 2025-06-18 specification, `notifications/prompts/list_changed` is
/// an optional notification from the server to the client, informing it that the
/// list of prompts it offers has changed.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{PromptListChangedHandler, HandlerResult};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyPromptListHandler;
///
/// #[async_trait]
/// impl PromptListChangedHandler for MyPromptListHandler {
///     async fn handle_prompt_list_changed(&self) -> HandlerResult<()> {
///         println!("Server's prompt list changed - refreshing...");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait PromptListChangedHandler: Send + Sync + std::fmt::Debug {
    /// Handle a prompt list changed notification
    ///
    /// This method is called when the server's available prompt list changes.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the notification was processed successfully.
    async fn handle_prompt_list_changed(&self) -> HandlerResult<()>;
}

/// Handler for tool list changes
///
/// Per MCP 2025-06-18 specification, `notifications/tools/list_changed` is
/// an optional notification from the server to the client, informing it that the
/// list of tools it offers has changed.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::handlers::{ToolListChangedHandler, HandlerResult};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyToolListHandler;
///
/// #[async_trait]
/// impl ToolListChangedHandler for MyToolListHandler {
///     async fn handle_tool_list_changed(&self) -> HandlerResult<()> {
///         println!("Server's tool list changed - refreshing...");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ToolListChangedHandler: Send + Sync + std::fmt::Debug {
    /// Handle a tool list changed notification
    ///
    /// This method is called when the server's available tool list changes.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the notification was processed successfully.
    async fn handle_tool_list_changed(&self) -> HandlerResult<()>;
}

// ============================================================================
// HANDLER REGISTRY FOR CLIENT
// ============================================================================

/// Registry for managing client-side handlers
///
/// This registry holds all the handler implementations and provides methods
/// for registering and invoking them. It's used internally by the Client
/// to dispatch server-initiated requests to the appropriate handlers.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    /// Roots handler for filesystem root requests
    pub roots: Option<Arc<dyn RootsHandler>>,

    /// Elicitation handler for user input requests
    pub elicitation: Option<Arc<dyn ElicitationHandler>>,

    /// Log handler for server log messages
    pub log: Option<Arc<dyn LogHandler>>,

    /// Resource update handler for resource change notifications
    pub resource_update: Option<Arc<dyn ResourceUpdateHandler>>,

    /// Cancellation handler for cancellation notifications
    pub cancellation: Option<Arc<dyn CancellationHandler>>,

    /// Resource list changed handler
    pub resource_list_changed: Option<Arc<dyn ResourceListChangedHandler>>,

    /// Prompt list changed handler
    pub prompt_list_changed: Option<Arc<dyn PromptListChangedHandler>>,

    /// Tool list changed handler
    pub tool_list_changed: Option<Arc<dyn ToolListChangedHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty handler registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a roots handler
    pub fn set_roots_handler(&mut self, handler: Arc<dyn RootsHandler>) {
        debug!("Registering roots handler");
        self.roots = Some(handler);
    }

    /// Register an elicitation handler
    pub fn set_elicitation_handler(&mut self, handler: Arc<dyn ElicitationHandler>) {
        debug!("Registering elicitation handler");
        self.elicitation = Some(handler);
    }

    /// Register a log handler
    pub fn set_log_handler(&mut self, handler: Arc<dyn LogHandler>) {
        debug!("Registering log handler");
        self.log = Some(handler);
    }

    /// Register a resource update handler
    pub fn set_resource_update_handler(&mut self, handler: Arc<dyn ResourceUpdateHandler>) {
        debug!("Registering resource update handler");
        self.resource_update = Some(handler);
    }

    /// Register a cancellation handler
    pub fn set_cancellation_handler(&mut self, handler: Arc<dyn CancellationHandler>) {
        debug!("Registering cancellation handler");
        self.cancellation = Some(handler);
    }

    /// Register a resource list changed handler
    pub fn set_resource_list_changed_handler(
        &mut self,
        handler: Arc<dyn ResourceListChangedHandler>,
    ) {
        debug!("Registering resource list changed handler");
        self.resource_list_changed = Some(handler);
    }

    /// Register a prompt list changed handler
    pub fn set_prompt_list_changed_handler(&mut self, handler: Arc<dyn PromptListChangedHandler>) {
        debug!("Registering prompt list changed handler");
        self.prompt_list_changed = Some(handler);
    }

    /// Register a tool list changed handler
    pub fn set_tool_list_changed_handler(&mut self, handler: Arc<dyn ToolListChangedHandler>) {
        debug!("Registering tool list changed handler");
        self.tool_list_changed = Some(handler);
    }

    /// Check if a roots handler is registered
    #[must_use]
    pub fn has_roots_handler(&self) -> bool {
        self.roots.is_some()
    }

    /// Check if an elicitation handler is registered
    #[must_use]
    pub fn has_elicitation_handler(&self) -> bool {
        self.elicitation.is_some()
    }

    /// Check if a log handler is registered
    #[must_use]
    pub fn has_log_handler(&self) -> bool {
        self.log.is_some()
    }

    /// Check if a resource update handler is registered
    #[must_use]
    pub fn has_resource_update_handler(&self) -> bool {
        self.resource_update.is_some()
    }

    /// Get the log handler if registered
    #[must_use]
    pub fn get_log_handler(&self) -> Option<Arc<dyn LogHandler>> {
        self.log.clone()
    }

    /// Get the resource update handler if registered
    #[must_use]
    pub fn get_resource_update_handler(&self) -> Option<Arc<dyn ResourceUpdateHandler>> {
        self.resource_update.clone()
    }

    /// Get the cancellation handler if registered
    #[must_use]
    pub fn get_cancellation_handler(&self) -> Option<Arc<dyn CancellationHandler>> {
        self.cancellation.clone()
    }

    /// Get the resource list changed handler if registered
    #[must_use]
    pub fn get_resource_list_changed_handler(&self) -> Option<Arc<dyn ResourceListChangedHandler>> {
        self.resource_list_changed.clone()
    }

    /// Get the prompt list changed handler if registered
    #[must_use]
    pub fn get_prompt_list_changed_handler(&self) -> Option<Arc<dyn PromptListChangedHandler>> {
        self.prompt_list_changed.clone()
    }

    /// Get the tool list changed handler if registered
    #[must_use]
    pub fn get_tool_list_changed_handler(&self) -> Option<Arc<dyn ToolListChangedHandler>> {
        self.tool_list_changed.clone()
    }

    /// Handle a roots/list request from the server
    pub async fn handle_roots_request(&self) -> HandlerResult<Vec<fluxmcp_protocol::types::Root>> {
        match &self.roots {
            Some(handler) => {
                info!("Processing roots/list request from server");
                handler.handle_roots_request().await
            }
            None => {
                warn!("No roots handler registered, returning empty roots list");
                // Return empty list per MCP spec - client has no roots available
                Ok(Vec::new())
            }
        }
    }

    /// Handle an elicitation request
    pub async fn handle_elicitation(
        &self,
        request: ElicitationRequest,
    ) -> HandlerResult<ElicitationResponse> {
        match &self.elicitation {
            Some(handler) => {
                info!("Processing elicitation request: {}", request.id);
                handler.handle_elicitation(request).await
            }
            None => {
                warn!("No elicitation handler registered, declining request");
                Err(HandlerError::Configuration {
                    message: "No elicitation handler registered".to_string(),
                })
            }
        }
    }

    /// Handle a log message
    pub async fn handle_log(&self, log: LoggingNotification) -> HandlerResult<()> {
        match &self.log {
            Some(handler) => handler.handle_log(log).await,
            None => {
                debug!("No log handler registered, ignoring log message");
                Ok(())
            }
        }
    }

    /// Handle a resource update notification
    pub async fn handle_resource_update(
        &self,
        notification: ResourceUpdatedNotification,
    ) -> HandlerResult<()> {
        match &self.resource_update {
            Some(handler) => {
                debug!("Processing resource update: {}", notification.uri);
                handler.handle_resource_update(notification).await
            }
            None => {
                debug!("No resource update handler registered, ignoring notification");
                Ok(())
            }
        }
    }
}

// ============================================================================
// HUMAN-IN-THE-LOOP APPROVAL FRAMEWORK
// ============================================================================
//
// `tools/call` from a host-facing caller is gated by an approval handler
// before the request ever reaches the transport. A handler is either a plain
// async function `(name, arguments) -> Decision`, or one assembled from
// `HandlerBuilder`'s options/guards/hooks. Non-`Decision` returns (a bare
// `bool`, say) are always denied — fail-closed, never inferred as approval.

/// Outcome of an approval decision for a single `tools/call`.
#[derive(Debug)]
pub enum Decision {
    /// The call may proceed.
    Approved,
    /// The call is rejected; `reason` is surfaced in the cancelled-execution result.
    Denied { reason: String },
    /// The decision is made out of band. `promise` resolves once `approve`/`deny`
    /// is called against `id` on the owning `ApprovalRegistry`, or `timeout` elapses.
    Deferred {
        id: String,
        timeout: Duration,
        promise: tokio::sync::oneshot::Receiver<ApprovalOutcome>,
    },
}

/// Resolution fed into a deferred [`Decision`] via [`ApprovalRegistry::approve`]/[`ApprovalRegistry::deny`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Approved,
    Denied { reason: String },
}

/// A handler that decides whether a host-facing `tools/call` may proceed.
#[async_trait]
pub trait ApprovalHandler: Send + Sync + std::fmt::Debug {
    /// Decide whether `name` may be called with `arguments`.
    async fn execute(&self, name: &str, arguments: &serde_json::Value) -> Decision;

    /// Invoked when a `Decision::Deferred` this handler produced times out
    /// without being resolved via the registry. No-op by default.
    fn on_timeout(&self, _approval_id: &str) {}
}

/// Outcome of running the approval pipeline ahead of an outbound `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Approved,
    Denied { reason: String },
}

/// Runs `handler` against `name`/`arguments`, resolving a `Deferred` decision
/// against its own timeout. Used by `call_tool` ahead of the outbound request.
pub async fn run_approval_gate(
    handler: &dyn ApprovalHandler,
    name: &str,
    arguments: &serde_json::Value,
) -> GateOutcome {
    match handler.execute(name, arguments).await {
        Decision::Approved => GateOutcome::Approved,
        Decision::Denied { reason } => GateOutcome::Denied { reason },
        Decision::Deferred {
            id,
            timeout,
            promise,
        } => match tokio::time::timeout(timeout, promise).await {
            Ok(Ok(ApprovalOutcome::Approved)) => GateOutcome::Approved,
            Ok(Ok(ApprovalOutcome::Denied { reason })) => GateOutcome::Denied { reason },
            Ok(Err(_)) => GateOutcome::Denied {
                reason: format!("approval {id} was abandoned without a decision"),
            },
            Err(_) => {
                handler.on_timeout(&id);
                GateOutcome::Denied {
                    reason: format!("approval {id} timed out after {timeout:?}"),
                }
            }
        },
    }
}

/// Registry of pending deferred approvals, keyed by `approval_id`.
///
/// `HandlerBuilder`-produced handlers hand a `Decision::Deferred` back to the
/// caller of `execute`, and retain the resolving half of the same channel
/// here so an out-of-band caller (a UI action, another request handler) can
/// later call `approve`/`deny` by id.
#[derive(Debug, Default)]
pub struct ApprovalRegistry {
    pending: dashmap::DashMap<String, tokio::sync::oneshot::Sender<ApprovalOutcome>>,
}

impl ApprovalRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh deferred approval under `id`, returning the receiving
    /// half as a `Decision::Deferred` for the handler to return from `execute`.
    pub fn defer(&self, id: impl Into<String>, timeout: Duration) -> Decision {
        let id = id.into();
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.pending.insert(id.clone(), tx);
        Decision::Deferred {
            id,
            timeout,
            promise: rx,
        }
    }

    /// Resolve `id` as approved. Returns `false` if no such id is pending
    /// (already resolved, timed out, or never registered).
    pub fn approve(&self, id: &str) -> bool {
        match self.pending.remove(id) {
            Some((_, tx)) => tx.send(ApprovalOutcome::Approved).is_ok(),
            None => false,
        }
    }

    /// Resolve `id` as denied with `reason`. Returns `false` if no such id is pending.
    pub fn deny(&self, id: &str, reason: impl Into<String>) -> bool {
        match self.pending.remove(id) {
            Some((_, tx)) => tx
                .send(ApprovalOutcome::Denied {
                    reason: reason.into(),
                })
                .is_ok(),
            None => false,
        }
    }
}

type Guard = Arc<dyn Fn(&str, &serde_json::Value) -> std::result::Result<(), String> + Send + Sync>;
type Hook = Arc<dyn Fn(&str, &serde_json::Value) + Send + Sync>;
type TimeoutHook = Arc<dyn Fn(&str) + Send + Sync>;
type DecisionFuture = std::pin::Pin<Box<dyn std::future::Future<Output = Decision> + Send>>;
type ExecuteFn = Arc<dyn Fn(String, serde_json::Value) -> DecisionFuture + Send + Sync>;

/// A named option a `HandlerBuilder`-produced handler accepts, filled from
/// the tool call's arguments (or `default`, or rejected if `required`).
#[derive(Debug, Clone)]
pub struct HandlerOption {
    pub name: String,
    pub required: bool,
    pub default: Option<serde_json::Value>,
}

/// Assembles an [`ApprovalHandler`] from declared options, guards, lifecycle
/// hooks, and an `execute` step — the programmatic counterpart of a
/// decorator-based handler class: `option`/`guard`/`before_execute`/
/// `after_execute`/`on_timeout`/`async_execution`.
pub struct HandlerBuilder {
    options: Vec<HandlerOption>,
    guards: Vec<Guard>,
    before_execute: Vec<Hook>,
    after_execute: Vec<Hook>,
    on_timeout: Option<TimeoutHook>,
    timeout: Duration,
    execute: Option<ExecuteFn>,
}

impl Default for HandlerBuilder {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            guards: Vec::new(),
            before_execute: Vec::new(),
            after_execute: Vec::new(),
            on_timeout: None,
            timeout: Duration::from_secs(30),
            execute: None,
        }
    }
}

impl std::fmt::Debug for HandlerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerBuilder")
            .field("options", &self.options)
            .field("guards", &self.guards.len())
            .field("before_execute", &self.before_execute.len())
            .field("after_execute", &self.after_execute.len())
            .field("on_timeout", &self.on_timeout.is_some())
            .field("timeout", &self.timeout)
            .field("execute", &self.execute.is_some())
            .finish()
    }
}

impl HandlerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a named option. Missing-but-required options deny the call
    /// before any guard or execute step runs; missing-with-a-default options
    /// are filled in.
    #[must_use]
    pub fn option(
        mut self,
        name: impl Into<String>,
        required: bool,
        default: Option<serde_json::Value>,
    ) -> Self {
        self.options.push(HandlerOption {
            name: name.into(),
            required,
            default,
        });
        self
    }

    /// Add a guard. A guard returning `Err(reason)` short-circuits to denial
    /// before `execute` runs.
    #[must_use]
    pub fn guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&str, &serde_json::Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.guards.push(Arc::new(guard));
        self
    }

    /// Add a hook run immediately before `execute`.
    #[must_use]
    pub fn before_execute<H>(mut self, hook: H) -> Self
    where
        H: Fn(&str, &serde_json::Value) + Send + Sync + 'static,
    {
        self.before_execute.push(Arc::new(hook));
        self
    }

    /// Add a hook run immediately after `execute` resolves.
    #[must_use]
    pub fn after_execute<H>(mut self, hook: H) -> Self
    where
        H: Fn(&str, &serde_json::Value) + Send + Sync + 'static,
    {
        self.after_execute.push(Arc::new(hook));
        self
    }

    /// Set the hook fired when a `Decision::Deferred` this handler produced
    /// times out.
    #[must_use]
    pub fn on_timeout<H>(mut self, hook: H) -> Self
    where
        H: Fn(&str) + Send + Sync + 'static,
    {
        self.on_timeout = Some(Arc::new(hook));
        self
    }

    /// Cap how long a single `execute` invocation may run before it's
    /// aborted and treated as a timeout (default 30s). Distinct from a
    /// `Decision::Deferred`'s own timeout, which governs out-of-band
    /// resolution rather than the `execute` call itself.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `execute`/`async_execution` step. Its return value becomes
    /// the handler's decision — return `ApprovalRegistry::defer(..)`'s result
    /// from inside it to declare deferred (asynchronous) approval.
    #[must_use]
    pub fn async_execution<F, Fut>(mut self, execute: F) -> Self
    where
        F: Fn(String, serde_json::Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Decision> + Send + 'static,
    {
        self.execute = Some(Arc::new(move |name, args| Box::pin(execute(name, args))));
        self
    }

    /// Build the handler. An unconfigured `execute` step always denies.
    #[must_use]
    pub fn build(self) -> BuiltHandler {
        BuiltHandler {
            options: self.options,
            guards: self.guards,
            before_execute: self.before_execute,
            after_execute: self.after_execute,
            on_timeout: self.on_timeout,
            timeout: self.timeout,
            execute: self.execute,
        }
    }
}

/// An [`ApprovalHandler`] assembled by [`HandlerBuilder`].
pub struct BuiltHandler {
    options: Vec<HandlerOption>,
    guards: Vec<Guard>,
    before_execute: Vec<Hook>,
    after_execute: Vec<Hook>,
    on_timeout: Option<TimeoutHook>,
    timeout: Duration,
    execute: Option<ExecuteFn>,
}

impl std::fmt::Debug for BuiltHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltHandler")
            .field("options", &self.options)
            .field("guards", &self.guards.len())
            .finish_non_exhaustive()
    }
}

impl BuiltHandler {
    fn apply_options(
        &self,
        arguments: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, String> {
        let mut merged = arguments.clone();
        if self.options.is_empty() {
            return Ok(merged);
        }
        let obj = merged
            .as_object_mut()
            .ok_or_else(|| "tool arguments must be a JSON object".to_string())?;
        for option in &self.options {
            if obj.contains_key(&option.name) {
                continue;
            }
            if let Some(default) = &option.default {
                obj.insert(option.name.clone(), default.clone());
            } else if option.required {
                return Err(format!("missing required option '{}'", option.name));
            }
        }
        Ok(merged)
    }
}

#[async_trait]
impl ApprovalHandler for BuiltHandler {
    async fn execute(&self, name: &str, arguments: &serde_json::Value) -> Decision {
        let arguments = match self.apply_options(arguments) {
            Ok(args) => args,
            Err(reason) => return Decision::Denied { reason },
        };

        for guard in &self.guards {
            if let Err(reason) = guard(name, &arguments) {
                return Decision::Denied { reason };
            }
        }

        let Some(execute) = &self.execute else {
            return Decision::Denied {
                reason: "handler has no execute step configured".to_string(),
            };
        };

        for hook in &self.before_execute {
            hook(name, &arguments);
        }

        // Run on a spawned task so a panic inside `execute` is caught as a
        // JoinError rather than unwinding through the dispatcher, and so it
        // can be aborted if it exceeds `self.timeout`.
        let task = tokio::spawn(execute(name.to_string(), arguments.clone()));
        let abort_handle = task.abort_handle();
        let decision = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(decision)) => decision,
            Ok(Err(join_err)) => {
                error!("approval handler for '{}' panicked: {}", name, join_err);
                Decision::Denied {
                    reason: format!("approval handler panicked: {join_err}"),
                }
            }
            Err(_) => {
                abort_handle.abort();
                warn!(
                    "approval handler for '{}' exceeded its {:?} execute timeout",
                    name, self.timeout
                );
                if let Some(hook) = &self.on_timeout {
                    hook(name);
                }
                Decision::Denied {
                    reason: format!("approval handler timed out after {:?}", self.timeout),
                }
            }
        };

        for hook in &self.after_execute {
            hook(name, &arguments);
        }

        decision
    }

    fn on_timeout(&self, approval_id: &str) {
        if let Some(hook) = &self.on_timeout {
            hook(approval_id);
        }
    }
}

/// Wraps a bare boolean-returning predicate as an [`ApprovalHandler`].
///
/// A `bool` is not a normalized [`Decision`]: per the fail-closed rule this
/// handler always denies, regardless of the predicate's return value, and
/// logs a warning pointing at `Decision`/`HandlerBuilder` instead.
#[derive(Debug)]
pub struct UnnormalizedBoolHandler<F>
where
    F: Fn(&str, &serde_json::Value) -> bool + Send + Sync + std::fmt::Debug,
{
    predicate: F,
}

impl<F> UnnormalizedBoolHandler<F>
where
    F: Fn(&str, &serde_json::Value) -> bool + Send + Sync + std::fmt::Debug,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

#[async_trait]
impl<F> ApprovalHandler for UnnormalizedBoolHandler<F>
where
    F: Fn(&str, &serde_json::Value) -> bool + Send + Sync + std::fmt::Debug + 'static,
{
    async fn execute(&self, name: &str, arguments: &serde_json::Value) -> Decision {
        let _ = (self.predicate)(name, arguments);
        warn!(
            "approval handler for tool '{}' returned a bare bool, not a Decision; denying per the fail-closed rule",
            name
        );
        Decision::Denied {
            reason: "approval callback did not return a normalized Decision".to_string(),
        }
    }
}

// ============================================================================
// DEFAULT HANDLER IMPLEMENTATIONS
// ============================================================================

/// Default elicitation handler that declines all requests
#[derive(Debug)]
pub struct DeclineElicitationHandler;

#[async_trait]
impl ElicitationHandler for DeclineElicitationHandler {
    async fn handle_elicitation(
        &self,
        request: ElicitationRequest,
    ) -> HandlerResult<ElicitationResponse> {
        warn!("Declining elicitation request: {}", request.message());
        Ok(ElicitationResponse::decline())
    }
}

/// Default log handler that routes server logs to tracing
#[derive(Debug)]
pub struct TracingLogHandler;

#[async_trait]
impl LogHandler for TracingLogHandler {
    async fn handle_log(&self, log: LoggingNotification) -> HandlerResult<()> {
        let logger_prefix = log.logger.as_deref().unwrap_or("server");

        // Per MCP spec: data can be any JSON type (string, object, etc.)
        let message = log.data.to_string();
        match log.level {
            LogLevel::Error => error!("[{}] {}", logger_prefix, message),
            LogLevel::Warning => warn!("[{}] {}", logger_prefix, message),
            LogLevel::Info => info!("[{}] {}", logger_prefix, message),
            LogLevel::Debug => debug!("[{}] {}", logger_prefix, message),
            LogLevel::Notice => info!("[{}] [NOTICE] {}", logger_prefix, message),
            LogLevel::Critical => error!("[{}] [CRITICAL] {}", logger_prefix, message),
            LogLevel::Alert => error!("[{}] [ALERT] {}", logger_prefix, message),
            LogLevel::Emergency => error!("[{}] [EMERGENCY] {}", logger_prefix, message),
        }

        Ok(())
    }
}

/// Default resource update handler that logs changes
#[derive(Debug)]
pub struct LoggingResourceUpdateHandler;

#[async_trait]
impl ResourceUpdateHandler for LoggingResourceUpdateHandler {
    async fn handle_resource_update(
        &self,
        notification: ResourceUpdatedNotification,
    ) -> HandlerResult<()> {
        // Per MCP spec: notification only contains URI
        info!("Resource {} was updated", notification.uri);
        Ok(())
    }
}

/// Default cancellation handler that logs cancellation notifications
#[derive(Debug)]
pub struct LoggingCancellationHandler;

#[async_trait]
impl CancellationHandler for LoggingCancellationHandler {
    async fn handle_cancellation(&self, notification: CancelledNotification) -> HandlerResult<()> {
        if let Some(reason) = &notification.reason {
            info!(
                "Request {} was cancelled: {}",
                notification.request_id, reason
            );
        } else {
            info!("Request {} was cancelled", notification.request_id);
        }
        Ok(())
    }
}

/// Default resource list changed handler that logs changes
#[derive(Debug)]
pub struct LoggingResourceListChangedHandler;

#[async_trait]
impl ResourceListChangedHandler for LoggingResourceListChangedHandler {
    async fn handle_resource_list_changed(&self) -> HandlerResult<()> {
        info!("Server's resource list changed");
        Ok(())
    }
}

/// Default prompt list changed handler that logs changes
#[derive(Debug)]
pub struct LoggingPromptListChangedHandler;

#[async_trait]
impl PromptListChangedHandler for LoggingPromptListChangedHandler {
    async fn handle_prompt_list_changed(&self) -> HandlerResult<()> {
        info!("Server's prompt list changed");
        Ok(())
    }
}

/// Default tool list changed handler that logs changes
#[derive(Debug)]
pub struct LoggingToolListChangedHandler;

#[async_trait]
impl ToolListChangedHandler for LoggingToolListChangedHandler {
    async fn handle_tool_list_changed(&self) -> HandlerResult<()> {
        info!("Server's tool list changed");
        Ok(())
    }
}
