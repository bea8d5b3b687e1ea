//! RFC 8707 Resource Indicators for OAuth 2.0
//!
//! This module implements resource indicator support as required by the MCP specification.
//! Resource indicators bind access tokens to specific resource servers, preventing token
//! misuse across service boundaries.
//!
//! # MCP Requirements
//!
//! Per MCP specification:
//! - Clients MUST include the `resource` parameter in authorization and token requests
//! - The resource parameter MUST identify the MCP server canonical URI
//! - Servers MUST validate tokens were issued specifically for them
//!
//! # RFC 8707 Compliance
//!
//! This implementation follows RFC 8707 Section 2 for resource identifiers:
//! - Uses absolute URIs (https://api.example.com/path)
//! - Normalizes scheme and host to lowercase
//! - Removes fragments (forbidden by spec)
//! - Removes query parameters (normalized form)
//! - Preserves port numbers when non-default

use fluxmcp_protocol::{Error as McpError, Result as McpResult};
use url::Url;

/// Validate and normalize a resource URI per RFC 8707
///
/// This function ensures the resource identifier meets RFC 8707 requirements
/// and returns it in canonical form for consistency.
///
/// # Requirements
///
/// - MUST be an absolute URI (scheme + host + path)
/// - MUST use http or https scheme
/// - MUST NOT contain fragments (#)
/// - SHOULD use lowercase scheme and host
/// - SHOULD omit trailing slash unless semantically significant
///
/// # Arguments
///
/// * `uri` - The resource URI to validate (e.g., "https://api.example.com/mcp")
///
/// # Returns
///
/// Canonical form of the URI suitable for use as a resource parameter
///
/// # Errors
///
/// Returns error if:
/// - URI is not a valid absolute URI
/// - Scheme is not http or https
/// - URI contains a fragment
/// - Host is missing
///
/// # Examples
///
/// ```rust
/// use fluxmcp_auth::oauth2::validate_resource_uri;
///
/// // Valid URIs
/// assert_eq!(
///     validate_resource_uri("https://api.example.com/mcp").unwrap(),
///     "https://api.example.com/mcp"
/// );
///
/// // Normalizes scheme and host to lowercase
/// assert_eq!(
///     validate_resource_uri("HTTPS://API.EXAMPLE.COM/mcp").unwrap(),
///     "https://api.example.com/mcp"
/// );
///
/// // Preserves non-default ports
/// assert_eq!(
///     validate_resource_uri("https://api.example.com:8443/mcp").unwrap(),
///     "https://api.example.com:8443/mcp"
/// );
///
/// // Removes fragments (forbidden)
/// let result = validate_resource_uri("https://api.example.com#fragment");
/// assert!(result.is_err());
/// ```
pub fn validate_resource_uri(uri: &str) -> McpResult<String> {
    // Parse URL
    let url = Url::parse(uri)
        .map_err(|e| McpError::validation(format!("Invalid resource URI format: {e}")))?;

    // Validate scheme (MCP requires https, but allow http for localhost development)
    match url.scheme() {
        "https" => {}
        "http" => {
            // Only allow http for localhost/127.0.0.1 (development only)
            if let Some(host) = url.host_str() {
                let is_localhost = host == "localhost"
                    || host == "127.0.0.1"
                    || host == "0.0.0.0"
                    || host == "[::1]"; // IPv6 localhost

                if !is_localhost {
                    return Err(McpError::validation(
                        "Resource URI must use https scheme (http only allowed for localhost)"
                            .to_string(),
                    ));
                }
            }
        }
        scheme => {
            return Err(McpError::validation(format!(
                "Resource URI must use http or https scheme, got: {scheme}"
            )));
        }
    }

    // Validate host is present
    let host = url
        .host_str()
        .ok_or_else(|| McpError::validation("Resource URI must have a valid host".to_string()))?;

    // Reject fragments (RFC 8707 requirement)
    if url.fragment().is_some() {
        return Err(McpError::validation(
            "Resource URI must not contain fragment (#)".to_string(),
        ));
    }

    // Build canonical URI
    // RFC 8707: normalize scheme and host to lowercase, preserve path
    let canonical = build_canonical_uri(&url, host)?;

    Ok(canonical)
}

/// Build canonical URI form per RFC 8707
fn build_canonical_uri(url: &Url, host: &str) -> McpResult<String> {
    let scheme = url.scheme().to_lowercase();
    let host_lower = host.to_lowercase();

    // Handle port (only include if non-default)
    let port_str = match url.port() {
        Some(port) => {
            // Check if it's the default port for the scheme
            let is_default = (scheme == "https" && port == 443) || (scheme == "http" && port == 80);

            if is_default {
                String::new()
            } else {
                format!(":{port}")
            }
        }
        None => String::new(),
    };

    // Get path, removing trailing slash unless it's just "/"
    let path = url.path();
    let normalized_path = if path == "/" {
        path.to_string()
    } else {
        path.trim_end_matches('/').to_string()
    };

    // Assemble canonical URI (scheme + host + port + path, no query or fragment)
    Ok(format!(
        "{scheme}://{host_lower}{port_str}{normalized_path}"
    ))
}
