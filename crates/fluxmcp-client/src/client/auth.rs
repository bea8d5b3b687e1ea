//! OAuth 2.1 client session (spec 4.E)
//!
//! Wires `fluxmcp-auth`'s discovery/DCR/OAuth2Client building blocks into a
//! per-connection session keyed by a canonicalized server URL: discovery
//! (protected-resource metadata, then per-issuer AS metadata/OIDC, then
//! origin fallback, then synthesized defaults), registration, the
//! authorization-code + PKCE flow, client-credentials, refresh, and the
//! 401/403 challenge-handling policy.
//!
//! `fluxmcp_auth::context::AuthContext` is shaped for validating an
//! *incoming* token (JWT claims: sub/iss/aud/exp/...), not for carrying a
//! client's own outbound session, so this module owns its state instead of
//! reusing it. See `DESIGN.md` for the recorded decision.

use std::time::{Duration, Instant};

use base64::Engine;
use fluxmcp_auth::discovery::{DiscoveryFetcher, ValidatedDiscoveryMetadata};
use fluxmcp_auth::oauth2::{DcrBuilder, DcrClient, OAuth2Client, RegistrationResponse};
use fluxmcp_auth::ssrf::SsrfValidator;
use fluxmcp_auth::{OAuth2Config, OAuth2FlowType, ProviderType, SecurityLevel, TokenInfo};
use fluxmcp_protocol::{Error, Result};
use rand::RngCore;
use secrecy::SecretString;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

/// A Token is valid iff `now < expires_at - skew` (spec invariant b).
const TOKEN_EXPIRY_SKEW: Duration = Duration::from_secs(60);

const PROTECTED_RESOURCE_MAX_BODY: usize = 10 * 1024;

/// Static configuration for authenticating against a single MCP server.
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    /// Statically configured client ID, if this MCP client was pre-registered
    /// with the authorization server. When absent, dynamic client
    /// registration (RFC 7591) is attempted on first use.
    pub client_id: Option<String>,
    /// Client secret paired with `client_id`, if this is a confidential
    /// client.
    pub client_secret: Option<String>,
    /// Redirect URI used for the authorization-code flow. Must be loopback
    /// or HTTPS per spec.
    pub redirect_uri: String,
    /// Scopes requested on authorization, client-credentials, and DCR.
    pub scopes: Vec<String>,
    /// Human-readable client name sent during dynamic registration.
    pub client_name: String,
}

/// A token plus the instant it was issued, so expiry-with-skew can be
/// computed independent of `OAuth2Client::is_token_expired`'s stubbed
/// `expires_in == 0` check.
#[derive(Debug, Clone)]
struct IssuedToken {
    info: TokenInfo,
    issued_at: Instant,
}

impl IssuedToken {
    fn is_valid(&self) -> bool {
        match self.info.expires_in {
            Some(secs) => {
                let expires_at = self.issued_at + Duration::from_secs(secs);
                let skewed = expires_at
                    .checked_sub(TOKEN_EXPIRY_SKEW)
                    .unwrap_or(self.issued_at);
                Instant::now() < skewed
            }
            // No expiry advertised: treat as valid until a 401 proves otherwise.
            None => true,
        }
    }
}

/// Server metadata and registered client info learned via discovery/DCR,
/// cached for the lifetime of the session.
#[derive(Debug, Clone, Default)]
struct ServerState {
    authorize_url: Option<String>,
    token_url: Option<String>,
    revocation_url: Option<String>,
    registration_url: Option<String>,
    registered: Option<RegistrationResponse>,
}

/// Transient authorization-code-flow state persisted between
/// `begin_authorization_code` and `complete_authorization_code`.
#[derive(Debug, Clone)]
struct PendingAuthorization {
    state: String,
    pkce_verifier: String,
}

/// Minimal RFC 9728 Protected Resource Metadata document.
#[derive(Debug, Clone, serde::Deserialize)]
struct ProtectedResourceMetadata {
    #[allow(dead_code)]
    resource: String,
    authorization_servers: Vec<String>,
}

/// Parsed `WWW-Authenticate: Bearer ...` challenge (spec 4.E, 4.D).
#[derive(Debug, Default, Clone)]
pub struct WwwAuthenticateChallenge {
    pub scope: Option<String>,
    pub resource_metadata: Option<String>,
    pub realm: Option<String>,
}

/// Per-connection OAuth 2.1 session (spec "OAuth session state").
///
/// One of these is held per MCP server connection, keyed implicitly by the
/// canonicalized server URL it was built for.
pub struct AuthSession {
    server_url: String,
    config: OAuthClientConfig,
    fetcher: DiscoveryFetcher,
    http_client: reqwest::Client,
    ssrf_validator: SsrfValidator,
    server_state: RwLock<ServerState>,
    token: RwLock<Option<IssuedToken>>,
    pending: RwLock<Option<PendingAuthorization>>,
    oauth_client: RwLock<Option<OAuth2Client>>,
}

impl AuthSession {
    /// Build a session for `server_url` (canonicalized per spec invariant a).
    pub fn new(server_url: &str, config: OAuthClientConfig) -> Result<Self> {
        let ssrf_validator = SsrfValidator::default();
        let fetcher = DiscoveryFetcher::new(SsrfValidator::default()).map_err(|e| {
            Error::configuration(format!("failed to build OAuth discovery fetcher: {e}"))
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::configuration(format!("failed to build OAuth HTTP client: {e}")))?;

        Ok(Self {
            server_url: canonicalize_server_url(server_url),
            config,
            fetcher,
            http_client,
            ssrf_validator,
            server_state: RwLock::new(ServerState::default()),
            token: RwLock::new(None),
            pending: RwLock::new(None),
            oauth_client: RwLock::new(None),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Current bearer token, if one is cached and still valid.
    pub async fn bearer_token(&self) -> Option<String> {
        let guard = self.token.read().await;
        guard
            .as_ref()
            .filter(|t| t.is_valid())
            .map(|t| t.info.access_token.clone())
    }

    /// Run the discovery chain (spec 4.E), stopping at first success:
    /// protected-resource metadata (using `resource_metadata_url` as a hint
    /// when a 401 challenge carried one), then per-issuer AS metadata/OIDC,
    /// then the server's own origin (legacy mode), then synthesized
    /// `/authorize` `/token` `/register` defaults.
    pub async fn discover(&self, resource_metadata_url: Option<&str>) -> Result<()> {
        let previous_registered = self.server_state.read().await.registered.clone();

        let mut new_state = match self
            .discover_via_protected_resource(resource_metadata_url)
            .await
        {
            Some(state) => state,
            None => match self.fetcher.fetch(&self.server_url).await {
                Ok(metadata) => server_state_from_metadata(&metadata),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        server_url = %self.server_url,
                        "OAuth discovery failed on every endpoint, synthesizing defaults"
                    );
                    synthesize_defaults(&self.server_url)
                }
            },
        };

        new_state.registered = previous_registered;
        *self.server_state.write().await = new_state;
        Ok(())
    }

    async fn discover_via_protected_resource(&self, hint: Option<&str>) -> Option<ServerState> {
        for url in protected_resource_candidate_urls(&self.server_url, hint) {
            let Ok(prm) = self.fetch_protected_resource_metadata(&url).await else {
                continue;
            };
            for issuer in &prm.authorization_servers {
                if let Ok(metadata) = self.fetcher.fetch(issuer).await {
                    return Some(server_state_from_metadata(&metadata));
                }
            }
        }
        None
    }

    async fn fetch_protected_resource_metadata(
        &self,
        url: &str,
    ) -> Result<ProtectedResourceMetadata> {
        self.ssrf_validator
            .validate_url(url)
            .map_err(|e| Error::transport(format!("SSRF check failed for {url}: {e}")))?;

        let response = self.http_client.get(url).send().await.map_err(|e| {
            Error::transport(format!("protected resource metadata fetch failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "protected resource metadata endpoint returned {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            Error::transport(format!("failed to read protected resource metadata: {e}"))
        })?;

        if bytes.len() > PROTECTED_RESOURCE_MAX_BODY {
            return Err(Error::transport(
                "protected resource metadata response exceeded size limit",
            ));
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| Error::serialization(format!("invalid protected resource metadata: {e}")))
    }

    /// Ensure a configured `OAuth2Client` exists for this server, performing
    /// Dynamic Client Registration (RFC 7591) when no static `client_id` was
    /// configured and nothing has been registered yet. Requires `discover()`
    /// to have run at least once.
    pub async fn ensure_client(&self) -> Result<()> {
        if self.oauth_client.read().await.is_some() {
            return Ok(());
        }

        let state = self.server_state.read().await.clone();
        let (authorize_url, token_url) = match (&state.authorize_url, &state.token_url) {
            (Some(a), Some(t)) => (a.clone(), t.clone()),
            _ => {
                return Err(Error::configuration(
                    "OAuth discovery has not run for this server",
                ));
            }
        };

        let (client_id, client_secret) = if let Some(id) = &self.config.client_id {
            (
                id.clone(),
                self.config.client_secret.clone().unwrap_or_default(),
            )
        } else if let Some(registered) = &state.registered {
            (
                registered.client_id.clone(),
                registered.client_secret.clone().unwrap_or_default(),
            )
        } else {
            let registration_url = state.registration_url.clone().ok_or_else(|| {
                Error::authentication(
                    "server advertised no registration endpoint and no static client_id was configured",
                )
            })?;
            let registered = self.register_client(&registration_url).await?;
            let result = (
                registered.client_id.clone(),
                registered.client_secret.clone().unwrap_or_default(),
            );
            self.server_state.write().await.registered = Some(registered);
            result
        };

        let oauth_config = OAuth2Config {
            client_id,
            client_secret: SecretString::new(client_secret),
            auth_url: authorize_url,
            token_url,
            revocation_url: state.revocation_url,
            redirect_uri: self.config.redirect_uri.clone(),
            scopes: self.config.scopes.clone(),
            flow_type: OAuth2FlowType::AuthorizationCode,
            additional_params: Default::default(),
            security_level: SecurityLevel::Standard,
            mcp_resource_uri: Some(self.server_url.clone()),
            auto_resource_indicators: true,
        };

        let client = OAuth2Client::new(&oauth_config, ProviderType::Generic)?;
        *self.oauth_client.write().await = Some(client);
        Ok(())
    }

    async fn register_client(&self, registration_url: &str) -> Result<RegistrationResponse> {
        let dcr = DcrClient::new(registration_url.to_string(), None);
        let request = DcrBuilder::mcp_client(&self.config.client_name, &self.config.redirect_uri)
            .with_scopes(self.config.scopes.clone())
            .build();
        dcr.register(request)
            .await
            .map_err(|e| Error::authentication(format!("dynamic client registration failed: {e}")))
    }

    /// Begin the authorization-code + PKCE flow (spec 4.E). Returns the URL
    /// the host should send the user's browser to; `complete_authorization_code`
    /// finishes the exchange once the redirect callback fires.
    pub async fn begin_authorization_code(&self) -> Result<String> {
        self.ensure_client().await?;
        let guard = self.oauth_client.read().await;
        let client = guard
            .as_ref()
            .expect("ensure_client() populates oauth_client or returns Err");

        let state = generate_csrf_state();
        let (auth_url, pkce_verifier) =
            client.authorization_code_flow(self.config.scopes.clone(), state.clone());

        *self.pending.write().await = Some(PendingAuthorization {
            state,
            pkce_verifier,
        });

        Ok(auth_url)
    }

    /// Complete the authorization-code flow after the host's redirect
    /// handler captured `code` and `state` from the callback. Validates
    /// `state` with a constant-time compare before exchanging the code.
    pub async fn complete_authorization_code(&self, code: &str, state: &str) -> Result<()> {
        let pending = self
            .pending
            .write()
            .await
            .take()
            .ok_or_else(|| Error::authentication("no authorization flow is pending for this server"))?;

        if !constant_time_eq(pending.state.as_bytes(), state.as_bytes()) {
            return Err(Error::authentication("CSRF state mismatch in OAuth callback"));
        }

        self.ensure_client().await?;
        let guard = self.oauth_client.read().await;
        let client = guard
            .as_ref()
            .expect("ensure_client() populates oauth_client or returns Err");

        let info = client
            .exchange_code_for_token(code.to_string(), pending.pkce_verifier.clone())
            .await
            .map_err(|e| Error::authentication(format!("authorization code exchange failed: {e}")))?;

        if info.access_token.is_empty() {
            return Err(Error::authentication(
                "token endpoint returned an empty access_token",
            ));
        }

        *self.token.write().await = Some(IssuedToken {
            info,
            issued_at: Instant::now(),
        });
        Ok(())
    }

    /// Client-credentials flow, used when configured directly or as a 401
    /// fallback when no refresh token is available.
    pub async fn client_credentials(&self) -> Result<()> {
        self.ensure_client().await?;
        let guard = self.oauth_client.read().await;
        let client = guard
            .as_ref()
            .expect("ensure_client() populates oauth_client or returns Err");

        let info = client
            .client_credentials_flow(self.config.scopes.clone())
            .await
            .map_err(|e| Error::authentication(format!("client credentials flow failed: {e}")))?;

        *self.token.write().await = Some(IssuedToken {
            info,
            issued_at: Instant::now(),
        });
        Ok(())
    }

    /// Refresh the current token using its `refresh_token`, if any. A new
    /// refresh token in the response supersedes the old one.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = {
            let guard = self.token.read().await;
            guard.as_ref().and_then(|t| t.info.refresh_token.clone())
        };
        let refresh_token =
            refresh_token.ok_or_else(|| Error::authentication("no refresh_token available"))?;

        self.ensure_client().await?;
        let guard = self.oauth_client.read().await;
        let client = guard
            .as_ref()
            .expect("ensure_client() populates oauth_client or returns Err");

        let info = client
            .refresh_access_token(&refresh_token)
            .await
            .map_err(|e| Error::authentication(format!("token refresh failed: {e}")))?;

        *self.token.write().await = Some(IssuedToken {
            info,
            issued_at: Instant::now(),
        });
        Ok(())
    }

    /// Handle a 401/403 challenge (spec 4.E): re-run discovery if the
    /// challenge carried a `resource_metadata` hint, then prefer refresh,
    /// else client-credentials, else surface `AuthenticationRequiredError`
    /// for the host to drive an interactive authorization-code flow.
    pub async fn handle_challenge(&self, www_authenticate: Option<&str>) -> Result<()> {
        let challenge = www_authenticate.map(parse_www_authenticate).unwrap_or_default();

        if let Some(metadata_url) = challenge.resource_metadata.as_deref() {
            self.discover(Some(metadata_url)).await?;
        }

        let has_refresh_token = self
            .token
            .read()
            .await
            .as_ref()
            .is_some_and(|t| t.info.refresh_token.is_some());

        if has_refresh_token && self.refresh().await.is_ok() {
            return Ok(());
        }

        if self.config.client_secret.is_some() && self.client_credentials().await.is_ok() {
            return Ok(());
        }

        Err(Error::authentication(
            "authorization required: no valid refresh or client-credentials path available; \
             an interactive authorization-code flow is needed",
        ))
    }
}

/// Normalize a server URL per spec invariant (a): scheme/host lowercased,
/// default port elided, trailing slash stripped, fragment removed.
pub fn canonicalize_server_url(raw: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(raw) else {
        return raw.trim_end_matches('/').to_ascii_lowercase();
    };

    parsed.set_fragment(None);
    let scheme = parsed.scheme().to_ascii_lowercase();
    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };
    let port = parsed.port().filter(|p| Some(*p) != default_port);

    let mut canonical = format!("{scheme}://{host}");
    if let Some(port) = port {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }
    canonical.push_str(parsed.path().trim_end_matches('/'));
    if let Some(query) = parsed.query() {
        canonical.push('?');
        canonical.push_str(query);
    }
    canonical
}

fn server_state_from_metadata(metadata: &ValidatedDiscoveryMetadata) -> ServerState {
    let oauth2 = metadata.oauth2();
    ServerState {
        authorize_url: Some(oauth2.authorization_endpoint.clone()),
        token_url: oauth2.token_endpoint.clone(),
        revocation_url: oauth2.revocation_endpoint.clone(),
        registration_url: oauth2.registration_endpoint.clone(),
        registered: None,
    }
}

fn synthesize_defaults(server_url: &str) -> ServerState {
    let origin = server_url.trim_end_matches('/');
    ServerState {
        authorize_url: Some(format!("{origin}/authorize")),
        token_url: Some(format!("{origin}/token")),
        revocation_url: None,
        registration_url: Some(format!("{origin}/register")),
        registered: None,
    }
}

fn protected_resource_candidate_urls(server_url: &str, hint: Option<&str>) -> Vec<String> {
    let mut urls = Vec::new();
    if let Some(hint) = hint {
        urls.push(hint.to_string());
    }

    if let Ok(parsed) = url::Url::parse(server_url) {
        let mut origin = format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or_default());
        if let Some(port) = parsed.port() {
            origin.push(':');
            origin.push_str(&port.to_string());
        }

        let path = parsed.path().trim_matches('/');
        if !path.is_empty() {
            urls.push(format!("{origin}/.well-known/oauth-protected-resource/{path}"));
        }
        urls.push(format!("{origin}/.well-known/oauth-protected-resource"));
    }

    urls
}

/// Parse a `WWW-Authenticate: Bearer ...` header per spec 4.E/4.D, pulling
/// out the `scope`, `resource_metadata`/`resource_metadata_url`, and `realm`
/// parameters.
pub fn parse_www_authenticate(header: &str) -> WwwAuthenticateChallenge {
    let mut challenge = WwwAuthenticateChallenge::default();
    let rest = header.trim().strip_prefix("Bearer").unwrap_or(header).trim_start();

    for part in rest.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim() {
            "scope" => challenge.scope = Some(value.to_string()),
            "resource_metadata" | "resource_metadata_url" => {
                challenge.resource_metadata = Some(value.to_string());
            }
            "realm" => challenge.realm = Some(value.to_string()),
            _ => {}
        }
    }

    challenge
}

/// CSRF state: URL-safe random, 32 bytes of entropy (spec 4.E).
fn generate_csrf_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_scheme_host_port_and_trailing_slash() {
        assert_eq!(
            canonicalize_server_url("HTTPS://Example.COM:443/mcp/"),
            "https://example.com/mcp"
        );
        assert_eq!(
            canonicalize_server_url("http://example.com:8080/mcp/"),
            "http://example.com:8080/mcp"
        );
    }

    #[test]
    fn strips_fragment() {
        assert_eq!(
            canonicalize_server_url("https://example.com/mcp#frag"),
            "https://example.com/mcp"
        );
    }

    #[test]
    fn parses_www_authenticate_challenge() {
        let challenge = parse_www_authenticate(
            r#"Bearer realm="mcp", scope="mcp:read", resource_metadata="https://example.com/.well-known/oauth-protected-resource""#,
        );
        assert_eq!(challenge.realm.as_deref(), Some("mcp"));
        assert_eq!(challenge.scope.as_deref(), Some("mcp:read"));
        assert_eq!(
            challenge.resource_metadata.as_deref(),
            Some("https://example.com/.well-known/oauth-protected-resource")
        );
    }

    #[test]
    fn protected_resource_candidates_include_hint_then_path_then_root() {
        let urls = protected_resource_candidate_urls(
            "https://example.com/mcp",
            Some("https://example.com/custom-metadata"),
        );
        assert_eq!(urls[0], "https://example.com/custom-metadata");
        assert_eq!(
            urls[1],
            "https://example.com/.well-known/oauth-protected-resource/mcp"
        );
        assert_eq!(urls[2], "https://example.com/.well-known/oauth-protected-resource");
    }

    #[test]
    fn issued_token_without_expiry_stays_valid() {
        let token = IssuedToken {
            info: TokenInfo {
                access_token: "abc".into(),
                token_type: "Bearer".into(),
                refresh_token: None,
                expires_in: None,
                scope: None,
            },
            issued_at: Instant::now(),
        };
        assert!(token.is_valid());
    }

    #[test]
    fn issued_token_past_skew_window_is_invalid() {
        let token = IssuedToken {
            info: TokenInfo {
                access_token: "abc".into(),
                token_type: "Bearer".into(),
                refresh_token: None,
                expires_in: Some(30),
                scope: None,
            },
            issued_at: Instant::now() - Duration::from_secs(10),
        };
        // expires_in=30s, skew=60s, already issued 10s ago: expires_at - skew is in the past.
        assert!(!token.is_valid());
    }
}
