// ── Core error types ──
//
// Domain errors surfaced to the accessory host. Each variant names the
// stage that failed (auth, configuration, identifier lookup, device query,
// command); transport details are folded into the message. A property
// missing from a device snapshot is not an error anywhere in this crate.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad credentials, token endpoint unreachable, or malformed token.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// A statically configured value is missing or invalid.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Dynamic identifier lookup failed or came back empty.
    #[error("Cannot resolve {identifier}: {reason}")]
    Resolution {
        identifier: &'static str,
        reason: String,
    },

    /// Device listing failed.
    #[error("Device query failed: {message}")]
    Query {
        message: String,
        status: Option<u16>,
    },

    /// Command could not be delivered.
    #[error("Command '{command}' failed: {message}")]
    Command {
        command: String,
        message: String,
        status: Option<u16>,
    },
}

impl CoreError {
    /// Map a device-listing failure.
    pub(crate) fn query(err: gardena_api::Error) -> Self {
        match err {
            gardena_api::Error::Authentication { message } => Self::Auth { message },
            other => Self::Query {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }

    /// Map an identifier lookup failure.
    pub(crate) fn resolution(identifier: &'static str, err: gardena_api::Error) -> Self {
        match err {
            gardena_api::Error::Authentication { message } => Self::Auth { message },
            other => Self::Resolution {
                identifier,
                reason: other.to_string(),
            },
        }
    }

    /// Map a command delivery failure.
    pub(crate) fn command(command: &str, err: gardena_api::Error) -> Self {
        match err {
            gardena_api::Error::Authentication { message } => Self::Auth { message },
            other => Self::Command {
                command: command.to_owned(),
                status: other.status(),
                message: other.to_string(),
            },
        }
    }

    /// HTTP status from the provider, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Query { status, .. } | Self::Command { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` for a stale location or device reference.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<gardena_api::Error> for CoreError {
    fn from(err: gardena_api::Error) -> Self {
        match err {
            gardena_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
            gardena_api::Error::Tls(message) => Self::Config { message },
            other => Self::query(other),
        }
    }
}
