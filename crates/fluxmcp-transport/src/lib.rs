//! # FluxMCP Transport
//!
//! Client transport implementations for the Model Context Protocol.
//!
//! ## Supported Transports
//!
//! - **STDIO**: spawns and communicates with a child-process MCP server over
//!   its stdin/stdout (always available)
//! - **HTTP/SSE**: the original HTTP transport, a `GET` event stream plus a
//!   `POST` endpoint learned from the stream's `endpoint` event
//! - **Streamable HTTP**: the MCP 2025-06-18 transport, a single endpoint
//!   accepting `POST` with either a JSON or SSE response, plus a resumable
//!   `GET` stream
//!
//! Bidirectional correlation (matching outbound requests to their responses,
//! and routing server-initiated requests back out) is transport-agnostic and
//! lives in [`bidirectional`].
//!
//! ## Module Organization
//!
//! ```text
//! fluxmcp-transport/
//! ├── core/                    # Transport trait, TransportMessage, TransportError
//! ├── bidirectional/           # Correlation context shared by all transports
//! ├── child_process/          # stdio transport (spawns a child process)
//! ├── http_sse_client/         # HTTP/SSE transport
//! ├── streamable_http_client/  # Streamable HTTP transport
//! ├── config/                  # Shared transport configuration
//! └── shared/                  # `Arc`-wrapped transport handle for fan-out
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::struct_excessive_bools,
    clippy::missing_panics_doc,
    clippy::default_trait_access
)]

pub mod bidirectional;
pub mod core;

#[cfg(feature = "http")]
pub mod http_sse_client;

#[cfg(feature = "http")]
pub mod streamable_http_client;

#[cfg(feature = "stdio")]
pub mod stdio;

pub mod child_process;
pub mod config;
pub mod shared;

// Re-export bidirectional correlation functionality
pub use bidirectional::{
    BidirectionalTransportWrapper, ConnectionState, CorrelationContext, MessageDirection,
    MessageRouter, ProtocolDirectionValidator, RouteAction,
};

// Re-export core transport traits and types
pub use core::{
    BidirectionalTransport, StreamingTransport, Transport, TransportCapabilities, TransportConfig,
    TransportError, TransportEvent, TransportMessage, TransportMetrics, TransportResult,
    TransportState, TransportType,
};

#[cfg(feature = "stdio")]
pub use stdio::StdioTransport;

#[cfg(feature = "http")]
pub use http_sse_client::{HttpSseClientConfig, HttpSseClientTransport};

#[cfg(feature = "http")]
pub use streamable_http_client::{StreamableHttpClientConfig, StreamableHttpClientTransport};

// Re-export child process transport (always available)
pub use child_process::{ChildProcessConfig, ChildProcessTransport};

pub use config::TransportConfigBuilder;
pub use shared::SharedTransport;

/// Transport feature detection.
#[derive(Debug)]
pub struct Features;

impl Features {
    /// Check if stdio transport is available.
    #[must_use]
    pub const fn has_stdio() -> bool {
        cfg!(feature = "stdio")
    }

    /// Check if HTTP/SSE and streamable-HTTP transports are available.
    #[must_use]
    pub const fn has_http() -> bool {
        cfg!(feature = "http")
    }

    /// Check if the child process transport is available (always true).
    #[must_use]
    pub const fn has_child_process() -> bool {
        true
    }

    /// Get list of available transport types.
    #[must_use]
    pub fn available_transports() -> Vec<TransportType> {
        let mut transports = Vec::new();

        if Self::has_stdio() {
            transports.push(TransportType::Stdio);
        }
        if Self::has_http() {
            transports.push(TransportType::Http);
        }
        if Self::has_child_process() {
            transports.push(TransportType::ChildProcess);
        }

        transports
    }
}
