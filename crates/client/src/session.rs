//! Session identity of the signed-in service provider.
//!
//! The access token and provider record are written to the key-value store
//! by the sign-in flow, which lives outside this crate. Here they are only
//! read, once, into an explicit [`Session`] that is handed to every client.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::warn;
use tripnest_core::ServiceProviderId;

use crate::error::ClientError;
use crate::store::KeyValueStore;

/// Store key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Store key holding the JSON service provider record (`{"id": ...}`).
pub const SERVICE_PROVIDER_KEY: &str = "serviceProvider";

/// Token and identity attached to every API call.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    access_token: SecretString,
    service_provider_id: ServiceProviderId,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("service_provider_id", &self.service_provider_id)
            .finish()
    }
}

impl Session {
    /// Build a session from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthMissing`] if the token is blank.
    pub fn new(
        access_token: impl Into<String>,
        service_provider_id: ServiceProviderId,
    ) -> Result<Self, ClientError> {
        let token = access_token.into();
        if token.trim().is_empty() {
            return Err(ClientError::AuthMissing);
        }
        Ok(Self {
            access_token: SecretString::from(token),
            service_provider_id,
        })
    }

    /// Read the session from the key-value store.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthMissing`] if the token or provider record
    /// is absent or unreadable, or [`ClientError::Store`] if the store fails.
    pub fn from_store(store: &dyn KeyValueStore) -> Result<Self, ClientError> {
        let token = store
            .get(ACCESS_TOKEN_KEY)?
            .ok_or(ClientError::AuthMissing)?;
        let provider = store
            .get(SERVICE_PROVIDER_KEY)?
            .ok_or(ClientError::AuthMissing)?;

        let provider_id = parse_provider_id(&provider).ok_or_else(|| {
            warn!("Stored service provider record has no usable id");
            ClientError::AuthMissing
        })?;

        Self::new(token, provider_id)
    }

    /// Bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Signed-in service provider.
    #[must_use]
    pub const fn service_provider_id(&self) -> ServiceProviderId {
        self.service_provider_id
    }
}

/// Extract `id` from the stored provider JSON; accepts a number or a
/// numeric string.
fn parse_provider_id(raw: &str) -> Option<ServiceProviderId> {
    let value: Value = serde_json::from_str(raw).ok()?;
    match value.get("id")? {
        Value::Number(n) => n.as_i64().map(ServiceProviderId::new),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
