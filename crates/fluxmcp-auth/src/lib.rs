//! # FluxMCP Auth - OAuth 2.1 Client Engine
//!
//! OAuth 2.1 authorization for MCP client connections, implementing the
//! authorization flows a client drives when a server challenges a request
//! with `401`/`403` and a `WWW-Authenticate` header.
//!
//! ## Flow
//!
//! 1. [`discovery`] fetches the authorization server's RFC 8414 metadata
//!    (falling back to OIDC discovery), guarded by [`ssrf`] validation.
//! 2. [`oauth2::dcr`] registers a client dynamically (RFC 7591) if the server
//!    supports it and no static client ID was configured.
//! 3. [`oauth2::client::OAuth2Client`] drives the authorization code flow with
//!    PKCE (RFC 7636), client credentials flow, or refresh.
//! 4. [`oauth2::resource`] validates the resource indicator (RFC 8707) bound
//!    to the token so it can only be replayed against the intended server.
//! 5. [`context::AuthContext`] represents the resulting session: claims,
//!    roles/scopes, and expiry, checked before each outgoing request.
//!
//! ## Feature Flags
//!
//! - `default` - OAuth2 client engine with discovery and SSRF protection
//! - `dpop` - Token-binding fields on [`context::AuthContext`] (RFC 9449)

// Submodules
pub mod config;
pub mod context;
pub mod discovery;
pub mod oauth2;
pub mod ssrf;
pub mod types;

// Re-export configuration types
#[doc(inline)]
pub use config::*;

// Re-export core types
#[doc(inline)]
pub use types::*;

// Re-export the canonical auth context
#[doc(inline)]
pub use context::{AuthContext, AuthContextBuilder, AuthError, ValidationConfig};
