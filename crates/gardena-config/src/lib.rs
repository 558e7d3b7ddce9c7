//! Shared configuration for Gardena mower tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `gardena_core::MowerConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use gardena_core::{
    AccessoryInfo, DEFAULT_START_DURATION_SECS, IdentifierStrategy, MowerConfig,
    default_base_url,
};

/// Keyring service name; entries are keyed `<profile>/password`.
pub const KEYRING_SERVICE: &str = "gardena";

/// Prefix of environment overrides, e.g. `GARDENA_DEFAULTS__TIMEOUT`.
pub const ENV_PREFIX: &str = "GARDENA_";

const PASSWORD_ENV: &str = "GARDENA_PASSWORD";
const USERNAME_ENV: &str = "GARDENA_USERNAME";
const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("no {what} configured for profile '{profile}'")]
    NoCredentials { profile: String, what: &'static str },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named mower profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// How a profile finds its location and mower ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierMode {
    /// Use `location_id` / `mower_id` as written.
    Static,
    /// Ask the provider: first location, first mower in it.
    Discover,
}

/// A named mower profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Account e-mail.
    pub username: Option<String>,

    /// Account password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// API root; defaults to the public smart system endpoint.
    pub base_url: Option<String>,

    /// Fallback `Authorization-Provider` header value.
    pub provider: Option<String>,

    /// Defaults to `static` when either id is set, `discover` otherwise.
    pub identifiers: Option<IdentifierMode>,

    pub location_id: Option<String>,
    pub mower_id: Option<String>,

    /// Seconds to mow when switched on.
    pub start_duration: Option<u32>,

    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the default timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    /// The identifier mode after applying the default.
    pub fn identifier_mode(&self) -> IdentifierMode {
        self.identifiers.unwrap_or(
            if self.location_id.is_some() || self.mower_id.is_some() {
                IdentifierMode::Static
            } else {
                IdentifierMode::Discover
            },
        )
    }

    /// Copy with the plaintext password masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| REDACTED.to_owned()),
            ..self.clone()
        }
    }
}

impl Config {
    /// The profile to use: `requested`, else `default_profile`, else
    /// `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_owned(),
                available: self.profile_names(),
            })
    }

    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Copy with every plaintext password masked.
    pub fn redacted(&self) -> Self {
        Self {
            profiles: self
                .profiles
                .iter()
                .map(|(name, p)| (name.clone(), p.redacted()))
                .collect(),
            ..self.clone()
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "gardena", "gardena").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gardena");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from `path` + environment. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the account username: profile, then `GARDENA_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    resolve_username_with(profile, profile_name, |key| std::env::var(key).ok())
}

/// Resolve the account password.
///
/// Order: the variable named by `password_env`, `GARDENA_PASSWORD`, the
/// system keyring, then the plaintext `password`.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |key| std::env::var(key).ok(),
        keyring_password,
    )
}

fn resolve_username_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| env(USERNAME_ENV))
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            what: "username",
        })
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        debug!(profile = profile_name, "password from profile env var");
        return Ok(SecretString::from(pw));
    }

    // 2. Global env var
    if let Some(pw) = env(PASSWORD_ENV) {
        debug!(profile = profile_name, "password from {PASSWORD_ENV}");
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring(profile_name) {
        debug!(profile = profile_name, "password from keyring");
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: "password",
    })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

// ── Translation to the runtime config ───────────────────────────────

/// Build a `MowerConfig` from a profile and the global defaults.
pub fn profile_to_mower_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<MowerConfig, ConfigError> {
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;
    build_mower_config(profile, defaults, username, password)
}

fn build_mower_config(
    profile: &Profile,
    defaults: &Defaults,
    username: String,
    password: SecretString,
) -> Result<MowerConfig, ConfigError> {
    let identifiers = match profile.identifier_mode() {
        IdentifierMode::Static => IdentifierStrategy::Static {
            location_id: profile.location_id.clone(),
            mower_id: profile.mower_id.clone(),
        },
        IdentifierMode::Discover => IdentifierStrategy::Discover,
    };

    let mut config = MowerConfig::new(username, password, identifiers);

    if let Some(ref raw) = profile.base_url {
        let url = raw.parse().map_err(|e| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("{e}: {raw}"),
        })?;
        config = config.with_base_url(url);
    } else {
        config.base_url = default_base_url();
    }

    if let Some(ref provider) = profile.provider {
        config.provider.clone_from(provider);
    }

    let duration = profile.start_duration.unwrap_or(DEFAULT_START_DURATION_SECS);
    if duration == 0 {
        return Err(ConfigError::Validation {
            field: "start_duration".into(),
            reason: "must be at least one second".into(),
        });
    }
    config.start_duration_secs = duration;

    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.ca_cert.clone_from(&profile.ca_cert);
    config.info = AccessoryInfo {
        manufacturer: profile.manufacturer.clone(),
        model: profile.model.clone(),
        serial_number: profile.serial_number.clone(),
    };

    Ok(config)
}
