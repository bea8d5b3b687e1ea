//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types for building
//! applications with the FluxMCP client library.
//!
//! # Example
//!
//! ```rust,no_run
//! use fluxmcp_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // All common types are available without deep imports
//!     let client = Client::new(StdioTransport::new());
//!     client.initialize().await?;
//!
//!     let tools = client.list_tools().await?;
//!     println!("Found {} tools", tools.len());
//!
//!     Ok(())
//! }
//! ```

// Core client types
pub use crate::{Client, ClientBuilder, ClientCapabilities, ConnectionConfig, InitializeResult};

// Handlers (bidirectional communication)
pub use crate::handlers::{
    CancellationHandler, CancelledNotification, ElicitationAction, ElicitationHandler,
    ElicitationRequest, ElicitationResponse, HandlerError, HandlerResult, LogHandler,
    LoggingNotification, PromptListChangedHandler, ResourceListChangedHandler,
    ResourceUpdateHandler, ResourceUpdatedNotification, RootsHandler, ToolListChangedHandler,
};

// Human-in-the-loop approval framework for `tools/call`
pub use crate::handlers::{
    ApprovalHandler, ApprovalOutcome, ApprovalRegistry, BuiltHandler, Decision, GateOutcome,
    HandlerBuilder, HandlerOption, UnnormalizedBoolHandler,
};

// Sampling
pub use crate::sampling::SamplingHandler;

// OAuth 2.1 session configuration
pub use crate::client::auth::{AuthSession, OAuthClientConfig};

// Result/Error - re-exported from fluxmcp_protocol
pub use fluxmcp_protocol::{Error, Result};

#[cfg(feature = "mcp-tasks")]
pub use fluxmcp_protocol::types::tasks::{ListTasksResult, Task, TaskStatus};

// Transport re-exports (with feature gates - must be separate items)
#[cfg(feature = "stdio")]
pub use fluxmcp_transport::StdioTransport;

#[cfg(feature = "http")]
pub use fluxmcp_transport::{
    HttpSseClientConfig, HttpSseClientTransport, StreamableHttpClientConfig,
    StreamableHttpClientTransport,
};

// Re-export commonly used protocol types
pub use fluxmcp_protocol::types::{
    CompleteResult,

    // Completion
    CompletionContext,
    Content,
    // Messaging
    CreateMessageRequest,
    CreateMessageResult,
    EmbeddedResource,
    ImageContent,
    // Logging
    LogLevel,

    Prompt,
    Resource,
    ResourceContents,

    Role,
    // Roots
    Root,
    StopReason,

    TextContent,
    // Core types
    Tool,
};

// Re-export async-trait for handler implementations
pub use async_trait::async_trait;

// Re-export Arc for handler registration
pub use std::sync::Arc;
