//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use gardena_config::ConfigError;
use gardena_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Gardena API")]
    #[diagnostic(
        code(gardena::connection_failed),
        help("Check your network connection and the profile's base_url.\n{message}")
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(gardena::auth_failed),
        help(
            "Verify the username and password of the active profile.\n\
             Run: gardena config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(gardena::no_credentials),
        help(
            "Set `username` in the profile, then store the password with\n\
             `gardena config set-password` or export GARDENA_PASSWORD."
        )
    )]
    NoCredentials { profile: String, what: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Cannot find the {identifier}: {reason}")]
    #[diagnostic(
        code(gardena::not_found),
        help("Run: gardena locations / gardena devices, then set location_id and mower_id")
    )]
    NotFound { identifier: String, reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(gardena::api_error))]
    ApiError { message: String, status: Option<u16> },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(gardena::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(gardena::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(gardena::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(gardena::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::ProfileNotFound { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::ApiError { .. } | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth { message } => Self::AuthFailed { message },
            CoreError::Config { message } => Self::Config { message },
            CoreError::Resolution { identifier, reason } => Self::NotFound {
                identifier: identifier.to_owned(),
                reason,
            },
            // Query and Command: no status means the request never got an answer.
            other => {
                let message = other.to_string();
                match other.status() {
                    None => Self::ConnectionFailed { message },
                    status @ Some(_) => Self::ApiError { message, status },
                }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name, available } => Self::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
                path: String::new(),
            },
            ConfigError::NoCredentials { profile, what } => Self::NoCredentials {
                profile,
                what: what.into(),
            },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
