//! # `FluxMCP` Client
//!
//! MCP (Model Context Protocol) client implementation for connecting to MCP servers
//! and consuming their capabilities (tools, prompts, resources, and sampling).
//!
//! ## Features
//!
//! - Connection management with automatic reconnection
//! - Error handling and recovery mechanisms
//! - Support for all MCP capabilities including bidirectional sampling
//! - Elicitation response handling for server-initiated user input requests
//! - Transport-agnostic design (works with any `Transport` implementation)
//! - Type-safe protocol communication
//! - Request/response correlation tracking via a background message dispatcher
//! - Timeout and cancellation support
//! - Automatic capability negotiation
//! - Handler support for server-initiated requests (sampling, elicitation, roots, logging, tasks)
//! - Long-running operation polling via the MCP task lifecycle
//! - OAuth 2.1 bearer authentication (see `fluxmcp-auth`) for HTTP-based transports
//!
//! ## Architecture
//!
//! The client follows a layered architecture:
//!
//! ```text
//! Application Layer
//!        ↓
//! Client API (this crate)
//!        ↓
//! Protocol Layer (fluxmcp-protocol)
//!        ↓
//! Transport Layer (fluxmcp-transport)
//! ```
//!
//! `Client<T>` is cheaply cloneable: it wraps an `Arc<ClientInner<T>>`, so handing
//! clones to concurrent tasks (one polling tools, another watching for server-initiated
//! requests) is just a refcount bump, not a lock around the whole client.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fluxmcp_client::Client;
//! use fluxmcp_transport::stdio::StdioTransport;
//!
//! # async fn example() -> fluxmcp_protocol::Result<()> {
//! // Create a client with stdio transport
//! let transport = StdioTransport::new();
//! let client = Client::new(transport);
//!
//! // Initialize connection and negotiate capabilities
//! let result = client.initialize().await?;
//! println!("Connected to: {}", result.server_info.name);
//!
//! // List and call tools
//! let tools = client.list_tools().await?;
//! for tool in tools {
//!     println!("Tool: {} - {}", tool.name, tool.description.as_deref().unwrap_or("No description"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Sampling Support
//!
//! Handle server-initiated sampling requests for LLM capabilities:
//!
//! ```rust,no_run
//! use fluxmcp_client::Client;
//! use fluxmcp_client::sampling::SamplingHandler;
//! use fluxmcp_protocol::types::{CreateMessageRequest, CreateMessageResult, Role, Content, TextContent, StopReason};
//! use async_trait::async_trait;
//!
//! #[derive(Debug)]
//! struct MySamplingHandler;
//!
//! #[async_trait]
//! impl SamplingHandler for MySamplingHandler {
//!     async fn handle_create_message(
//!         &self,
//!         request: CreateMessageRequest
//!     ) -> Result<CreateMessageResult, Box<dyn std::error::Error + Send + Sync>> {
//!         Ok(CreateMessageResult {
//!             role: Role::Assistant,
//!             content: Content::Text(
//!                 TextContent {
//!                     text: "Response from LLM".to_string(),
//!                     annotations: None,
//!                     meta: None,
//!                 }
//!             ),
//!             model: "gpt-4".to_string(),
//!             stop_reason: Some(StopReason::EndTurn),
//!             _meta: None,
//!         })
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! # use fluxmcp_client::Client;
//! # use fluxmcp_transport::stdio::StdioTransport;
//! # async fn example() -> fluxmcp_protocol::Result<()> {
//! # let client = Client::new(StdioTransport::new());
//! match client.call_tool("my_tool", None).await {
//!     Ok(result) => println!("Tool result: {:?}", result),
//!     Err(e) => eprintln!("Tool call failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod handlers;
pub mod sampling;

pub mod prelude;

use std::sync::Arc;

use fluxmcp_transport::Transport;

/// Client capability configuration
///
/// Defines the capabilities that this client supports when connecting to MCP servers.
/// These capabilities are sent during the initialization handshake to negotiate
/// which features will be available during the session.
///
/// # Examples
///
/// ```
/// use fluxmcp_client::ClientCapabilities;
///
/// let capabilities = ClientCapabilities {
///     tools: true,
///     prompts: true,
///     resources: true,
///     sampling: false,
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientCapabilities {
    /// Whether the client supports tool calling
    pub tools: bool,

    /// Whether the client supports prompts
    pub prompts: bool,

    /// Whether the client supports resources
    pub resources: bool,

    /// Whether the client supports sampling
    pub sampling: bool,
}

/// MCP client for communicating with servers
///
/// The `Client` struct provides a beautiful, ergonomic interface for interacting with MCP servers.
/// It handles all protocol complexity internally, exposing only clean, type-safe methods.
///
/// `Client<T>` is `Clone` (it wraps `Arc<ClientInner<T>>`), so it can be shared across
/// concurrent tasks directly without an extra `Arc<Mutex<_>>` wrapper.
pub use client::core::Client;

/// Result of client initialization
///
/// Contains information about the server and the negotiated capabilities
/// after a successful initialization handshake.
pub use client::config::{ConnectionConfig, InitializeResult};

/// Builder for configuring and creating MCP clients
///
/// Provides a fluent interface for configuring client options before creation:
/// protocol capabilities, connection timeouts, and handlers for server-initiated
/// requests (sampling, elicitation, logging, resource updates).
///
/// # Examples
///
/// ```rust,no_run
/// use fluxmcp_client::ClientBuilder;
/// use fluxmcp_transport::stdio::StdioTransport;
///
/// let client = ClientBuilder::new()
///     .with_tools(true)
///     .with_prompts(true)
///     .with_resources(false)
///     .build(StdioTransport::new());
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    capabilities: ClientCapabilities,
    connection_config: ConnectionConfig,
    elicitation_handler: Option<Arc<dyn crate::handlers::ElicitationHandler>>,
    log_handler: Option<Arc<dyn crate::handlers::LogHandler>>,
    resource_update_handler: Option<Arc<dyn crate::handlers::ResourceUpdateHandler>>,
    roots_handler: Option<Arc<dyn crate::handlers::RootsHandler>>,
    sampling_handler: Option<Arc<dyn crate::sampling::SamplingHandler>>,
    approval_handler: Option<Arc<dyn crate::handlers::ApprovalHandler>>,
}

impl ClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable tool support
    pub fn with_tools(mut self, enabled: bool) -> Self {
        self.capabilities.tools = enabled;
        self
    }

    /// Enable or disable prompt support
    pub fn with_prompts(mut self, enabled: bool) -> Self {
        self.capabilities.prompts = enabled;
        self
    }

    /// Enable or disable resource support
    pub fn with_resources(mut self, enabled: bool) -> Self {
        self.capabilities.resources = enabled;
        self
    }

    /// Enable or disable sampling support
    pub fn with_sampling(mut self, enabled: bool) -> Self {
        self.capabilities.sampling = enabled;
        self
    }

    /// Configure all capabilities at once
    pub fn with_capabilities(mut self, capabilities: ClientCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Configure connection settings (timeouts, retries, keepalive)
    pub fn with_connection_config(mut self, config: ConnectionConfig) -> Self {
        self.connection_config = config;
        self
    }

    /// Set request timeout in milliseconds
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.connection_config.timeout_ms = timeout_ms;
        self
    }

    /// Set maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.connection_config.max_retries = max_retries;
        self
    }

    /// Set retry delay in milliseconds
    pub fn with_retry_delay(mut self, delay_ms: u64) -> Self {
        self.connection_config.retry_delay_ms = delay_ms;
        self
    }

    /// Set keep-alive interval in milliseconds
    pub fn with_keepalive(mut self, interval_ms: u64) -> Self {
        self.connection_config.keepalive_ms = interval_ms;
        self
    }

    /// Register a handler for server-initiated `elicitation/create` requests
    pub fn with_elicitation_handler(
        mut self,
        handler: Arc<dyn crate::handlers::ElicitationHandler>,
    ) -> Self {
        self.elicitation_handler = Some(handler);
        self
    }

    /// Register a handler for server log notifications
    pub fn with_log_handler(mut self, handler: Arc<dyn crate::handlers::LogHandler>) -> Self {
        self.log_handler = Some(handler);
        self
    }

    /// Register a handler for `notifications/resources/updated`
    pub fn with_resource_update_handler(
        mut self,
        handler: Arc<dyn crate::handlers::ResourceUpdateHandler>,
    ) -> Self {
        self.resource_update_handler = Some(handler);
        self
    }

    /// Register a handler for server-initiated `roots/list` requests
    pub fn with_roots_handler(mut self, handler: Arc<dyn crate::handlers::RootsHandler>) -> Self {
        self.roots_handler = Some(handler);
        self
    }

    /// Register a handler for server-initiated `sampling/createMessage` requests
    pub fn with_sampling_handler(
        mut self,
        handler: Arc<dyn crate::sampling::SamplingHandler>,
    ) -> Self {
        self.sampling_handler = Some(handler);
        self
    }

    /// Register a human-in-the-loop approval handler gating outbound `tools/call` requests
    pub fn with_approval_handler(
        mut self,
        handler: Arc<dyn crate::handlers::ApprovalHandler>,
    ) -> Self {
        self.approval_handler = Some(handler);
        self
    }

    /// Build the client, wiring up all registered handlers
    ///
    /// The returned client is not yet initialized; call `initialize()` to perform
    /// the MCP handshake before issuing any other requests.
    pub fn build<T: Transport + 'static>(self, transport: T) -> Client<T> {
        let client = Client::with_capabilities(transport, self.capabilities);

        if let Some(handler) = self.elicitation_handler {
            client.set_elicitation_handler(handler);
        }
        if let Some(handler) = self.log_handler {
            client.set_log_handler(handler);
        }
        if let Some(handler) = self.resource_update_handler {
            client.set_resource_update_handler(handler);
        }
        if let Some(handler) = self.roots_handler {
            client.set_roots_handler(handler);
        }
        if let Some(handler) = self.sampling_handler {
            client.set_sampling_handler(handler);
        }
        if let Some(handler) = self.approval_handler {
            client.set_approval_handler(handler);
        }

        client
    }
}

pub use fluxmcp_protocol::types::ServerCapabilities as PublicServerCapabilities;
