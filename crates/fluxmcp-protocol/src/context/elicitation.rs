//! Context carried alongside a server-initiated elicitation request as it is
//! routed from the dispatcher to a client-registered [`ElicitationHandler`](crate::handlers::ElicitationHandler).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Timestamp;
use crate::types::elicitation::ElicitRequest;

/// Everything a handler needs to decide whether, and how, to answer an
/// `elicitation/create` request from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElicitationContext {
    /// Correlation id of the inbound JSON-RPC request carrying this elicitation.
    pub correlation_id: String,
    /// The originating server connection, if the client is connected to more than one.
    pub server_id: Option<String>,
    /// The elicitation request itself (form or URL mode, optional task metadata).
    pub request: ElicitRequest,
    /// When this context was created.
    pub received_at: Timestamp,
    /// Free-form metadata (e.g. transport, connection id) propagated from the
    /// inbound `RequestContext`.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ElicitationContext {
    /// Creates a new context for a just-received elicitation request.
    #[must_use]
    pub fn new(request: ElicitRequest) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            server_id: None,
            request,
            received_at: Timestamp::now(),
            metadata: HashMap::new(),
        }
    }

    /// Sets the originating server id.
    #[must_use]
    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    /// The human-readable prompt to show the user, regardless of form/URL mode.
    #[must_use]
    pub fn message(&self) -> &str {
        self.request.params.message()
    }
}
