//! OAuth 2.1 Implementation
//!
//! This module provides an OAuth 2.1 implementation with:
//! - Authorization Code flow with PKCE (RFC 7636)
//! - Refresh tokens
//! - Resource Indicators (RFC 8707)
//! - Protected Resource Metadata (RFC 9728)
//! - Dynamic Client Registration (RFC 7591)
//! - DPoP integration (RFC 9449)
//!
//! ## Submodules
//!
//! - `client` - OAuth2Client for basic operations
//! - `http_client` - reqwest adapter bridging the oauth2 crate's `AsyncHttpClient`
//! - `dcr` - Dynamic Client Registration (RFC 7591)
//! - `resource` - Resource Indicators (RFC 8707)
//! - `validation` - URI and security validation

pub mod client;
pub mod dcr;
pub mod http_client;
pub mod resource;
pub mod validation;

// Re-export client types
pub use client::OAuth2Client;

// Re-export DCR types
pub use dcr::{DcrBuilder, DcrClient, RegistrationRequest, RegistrationResponse};

// Re-export the HTTP client adapter
pub use http_client::{OAuth2HttpClient, OAuth2HttpError};

// Re-export resource indicator validation
pub use resource::validate_resource_uri;

// Re-export validation functions
pub use validation::*;
