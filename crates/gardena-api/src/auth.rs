use std::future::Future;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::Error;

/// Subtracted from the server-declared lifetime so a token is never
/// presented right at the edge of its validity.
pub const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_millis(5000);

/// Upper bound on a declared lifetime, keeps `Instant` arithmetic in range.
const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Account credentials for the token endpoint. Immutable once built.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// A bearer token with its local expiry.
///
/// Replaced wholesale on renewal, never mutated in place.
#[derive(Debug, Clone)]
pub struct Token {
    value: SecretString,
    expires_at: Instant,
    provider: Option<String>,
    user_id: Option<String>,
}

impl Token {
    /// Build a token that expires at an explicit instant.
    pub fn new(
        value: SecretString,
        expires_at: Instant,
        provider: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            value,
            expires_at,
            provider,
            user_id,
        }
    }

    /// Build a token from the lifetime the server declared, minus
    /// [`EXPIRY_SAFETY_MARGIN`].
    pub fn from_ttl(
        value: SecretString,
        ttl: Duration,
        provider: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        let effective = ttl.min(MAX_TOKEN_TTL).saturating_sub(EXPIRY_SAFETY_MARGIN);
        Self::new(value, Instant::now() + effective, provider, user_id)
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Usable iff `expires_at > now`.
    pub fn is_usable_at(&self, now: Instant) -> bool {
        self.expires_at > now
    }

    pub fn is_usable(&self) -> bool {
        self.is_usable_at(Instant::now())
    }

    /// Auth scheme variant reported by the token endpoint.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Account id the token was issued for.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Value for the `Authorization` header.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }

    fn is_same(&self, other: &Token) -> bool {
        self.expires_at == other.expires_at
            && self.value.expose_secret() == other.value.expose_secret()
    }
}

/// Memoizes one [`Token`] and coalesces concurrent refreshes.
///
/// The lock is held across the refresh future, so callers arriving while
/// a refresh is in flight wait for it and then reuse its result instead of
/// starting their own.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<Token>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token if still usable, otherwise run `refresh`
    /// once and cache its result.
    ///
    /// A failed refresh leaves the cache empty; the error goes to the
    /// caller and the next call tries again.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<Token, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Token, Error>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref().filter(|t| t.is_usable()) {
            return Ok(token.clone());
        }

        if slot.take().is_some() {
            debug!("cached token expired");
        }

        let token = refresh().await?;
        info!(
            user_id = token.user_id().unwrap_or("-"),
            "obtained new access token"
        );
        *slot = Some(token.clone());
        Ok(token)
    }

    /// The cached token, if one is present and usable.
    pub async fn current(&self) -> Option<Token> {
        self.slot
            .lock()
            .await
            .as_ref()
            .filter(|t| t.is_usable())
            .cloned()
    }

    /// Drop the cached token so the next call authenticates again, but only
    /// if it is still `rejected`. A token renewed in the meantime stays.
    pub async fn invalidate(&self, rejected: &Token) {
        let mut slot = self.slot.lock().await;
        if slot.as_ref().is_some_and(|t| t.is_same(rejected)) {
            slot.take();
            debug!("access token invalidated");
        } else {
            debug!("rejected token already replaced");
        }
    }
}
