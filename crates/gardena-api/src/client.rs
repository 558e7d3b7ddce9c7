// Provider API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer/provider headers,
// and status/body handling. Endpoint groups (token, locations, devices)
// are inherent methods in sibling modules so this file stays focused on
// transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Credentials, TokenCache};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Base URL of the smart system v1 API.
pub const DEFAULT_BASE_URL: &str = "https://smart.gardena.com/v1/";

/// Sent as `Authorization-Provider` when the token does not name one.
pub const DEFAULT_PROVIDER: &str = "husqvarna";

/// Longest body excerpt carried in an error message.
const BODY_PREVIEW_LEN: usize = 200;

/// Authenticated client for the provider REST API.
///
/// Owns the account [`Credentials`] and the [`TokenCache`]; every
/// authenticated request goes through [`token()`](Self::token) first.
#[derive(Debug)]
pub struct GardenaClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    provider: String,
    tokens: TokenCache,
}

impl GardenaClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `https://smart.gardena.com/v1/`.
    /// A missing trailing slash is added so relative endpoint paths join
    /// underneath it.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            credentials,
            provider: DEFAULT_PROVIDER.to_owned(),
            tokens: TokenCache::new(),
        }
    }

    /// Override the fallback `Authorization-Provider` header value.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint path relative to the API root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authenticated GET, deserializing the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {}", url);
        let builder = self.http.get(url).query(query);
        let resp = self.send_authorized(builder).await?;
        parse_json(resp).await
    }

    /// Authenticated POST with a JSON body. Returns the status and the
    /// body parsed as JSON when present.
    pub(crate) async fn post(
        &self,
        url: Url,
        query: &[(&str, &str)],
        body: &(impl Serialize + Sync),
    ) -> Result<(u16, Option<serde_json::Value>), Error> {
        debug!("POST {}", url);
        let builder = self.http.post(url).query(query).json(body);
        let resp = self.send_authorized(builder).await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok((status, None));
        }
        let payload =
            serde_json::from_str(&text).unwrap_or_else(|_| serde_json::Value::String(text));
        Ok((status, Some(payload)))
    }

    /// Attach bearer + provider headers, send, and turn non-success
    /// statuses into [`Error::Api`]. A 401 also drops the cached token, if
    /// it is still the one sent, so the next call authenticates afresh.
    async fn send_authorized(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let token = self.token().await?;
        let provider = token.provider().unwrap_or(&self.provider).to_owned();

        let resp = builder
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .header("Authorization-Provider", provider)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("provider rejected access token");
            self.tokens.invalidate(&token).await;
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: preview(&body),
        })
    }
}

/// Deserialize a response body, keeping the raw text on failure.
pub(crate) async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

pub(crate) fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_LEN).collect()
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
