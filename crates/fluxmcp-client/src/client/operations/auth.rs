//! OAuth 2.1 session configuration and challenge handling (spec 4.E)
//!
//! These methods configure the optional per-connection [`AuthSession`] and
//! drive it through the discovery/authorization/refresh flows. A client
//! with no configured session behaves exactly as before: `bearer_token()`
//! returns `None` and `handle_auth_challenge` fails fast.

use std::sync::Arc;

use fluxmcp_protocol::{Error, Result};

use crate::client::auth::{AuthSession, OAuthClientConfig};

impl<T: fluxmcp_transport::Transport + 'static> super::super::core::Client<T> {
    /// Configure OAuth 2.1 authentication for `server_url`. Must be called
    /// before `oauth_discover`/`oauth_bearer_token`/`handle_auth_challenge`.
    pub async fn configure_oauth(&self, server_url: &str, config: OAuthClientConfig) -> Result<()> {
        let session = Arc::new(AuthSession::new(server_url, config)?);
        *self.inner.auth.write().await = Some(session);
        Ok(())
    }

    /// Run OAuth discovery (protected-resource metadata, then per-issuer AS
    /// metadata/OIDC, then origin fallback, then synthesized defaults).
    pub async fn oauth_discover(&self) -> Result<()> {
        self.auth_session().await?.discover(None).await
    }

    /// Begin the authorization-code + PKCE flow, returning the URL the host
    /// should send the user's browser to.
    pub async fn oauth_begin_authorization(&self) -> Result<String> {
        self.auth_session().await?.begin_authorization_code().await
    }

    /// Complete the authorization-code flow with the `code`/`state` pair
    /// captured from the redirect callback.
    pub async fn oauth_complete_authorization(&self, code: &str, state: &str) -> Result<()> {
        self.auth_session()
            .await?
            .complete_authorization_code(code, state)
            .await
    }

    /// Current bearer token for this connection, if OAuth is configured and
    /// a valid token is cached.
    pub async fn oauth_bearer_token(&self) -> Option<String> {
        let guard = self.inner.auth.read().await;
        match guard.as_ref() {
            Some(session) => session.bearer_token().await,
            None => None,
        }
    }

    /// Handle a 401/403 response per spec 4.E: prefer refresh, then
    /// client-credentials, else return `AuthenticationRequiredError` for the
    /// host to drive an interactive flow. `www_authenticate` is the raw
    /// header value from the failing response, if present.
    pub async fn handle_auth_challenge(&self, www_authenticate: Option<&str>) -> Result<()> {
        self.auth_session()
            .await?
            .handle_challenge(www_authenticate)
            .await
    }

    async fn auth_session(&self) -> Result<Arc<AuthSession>> {
        self.inner
            .auth
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::configuration("OAuth is not configured for this client"))
    }
}
