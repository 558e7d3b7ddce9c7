// ── Runtime mower configuration ──
//
// Describes *how* to reach one mower: account credentials, where its
// identifiers come from, and transport tuning. Never touches disk; the
// config crate (or any host) builds a `MowerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;
use url::Url;

use gardena_api::{DEFAULT_BASE_URL, DEFAULT_PROVIDER};

/// Default `duration` parameter of the start command, in seconds.
pub const DEFAULT_START_DURATION_SECS: u32 = 180;

/// Where the location and mower ids come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierStrategy {
    /// Taken verbatim from configuration. A missing or empty value is a
    /// configuration error at the time it is needed.
    Static {
        location_id: Option<String>,
        mower_id: Option<String>,
    },
    /// Looked up once from the provider: the first location of the
    /// account, then the first `mower` device in that location.
    Discover,
}

/// Cosmetic device information a host shows next to the accessory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessoryInfo {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
}

/// Configuration for a single mower accessory.
#[derive(Debug, Clone)]
pub struct MowerConfig {
    /// API root, e.g. `https://smart.gardena.com/v1/`.
    pub base_url: Url,
    pub username: String,
    pub password: SecretString,
    /// Fallback `Authorization-Provider` header value.
    pub provider: String,
    pub identifiers: IdentifierStrategy,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra CA certificate for TLS-intercepting setups.
    pub ca_cert: Option<PathBuf>,
    /// `duration` sent with `start_override_timer`.
    pub start_duration_secs: u32,
    pub info: AccessoryInfo,
}

impl MowerConfig {
    /// Config against the public API with default tuning.
    pub fn new(
        username: impl Into<String>,
        password: SecretString,
        identifiers: IdentifierStrategy,
    ) -> Self {
        Self {
            base_url: default_base_url(),
            username: username.into(),
            password,
            provider: DEFAULT_PROVIDER.to_owned(),
            identifiers,
            timeout: Duration::from_secs(30),
            ca_cert: None,
            start_duration_secs: DEFAULT_START_DURATION_SECS,
            info: AccessoryInfo::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

/// Parsed [`DEFAULT_BASE_URL`].
pub fn default_base_url() -> Url {
    #[allow(clippy::expect_used)]
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}
