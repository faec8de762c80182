// ── Core error types ──
//
// User-facing errors from octoly-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<octoly_api::Error>`
// impl translates transport-layer errors into domain variants, and every
// variant maps onto one `ErrorKind` used for stable error identifiers.

use serde::Serialize;
use thiserror::Error;

/// Classification of a failure, used in error identifiers and exit codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
pub enum ErrorKind {
    Authentication,
    PermissionDenied,
    Connection,
    Timeout,
    NotFound,
    Conflict,
    Configuration,
    Validation,
    Cancelled,
    ProtocolViolation,
    Api,
    Internal,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Connection already released")]
    ConnectionClosed,

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Space not found: {name}")]
    SpaceNotFound { name: String },

    #[error("Server returned {matches} spaces named '{name}'")]
    AmbiguousSpace { name: String, matches: usize },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("{entity} '{name}' already exists")]
    Conflict { entity: String, name: String },

    // ── Invocation errors ────────────────────────────────────────────
    #[error("Invalid command configuration: {message}")]
    Configuration { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailed { .. } | Self::ConnectionClosed => ErrorKind::Connection,
            Self::AuthenticationFailed { .. } => ErrorKind::Authentication,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Timeout => ErrorKind::Timeout,
            Self::SpaceNotFound { .. } | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AmbiguousSpace { .. } => ErrorKind::ProtocolViolation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::ValidationFailed { .. } => ErrorKind::Validation,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Api { .. } => ErrorKind::Api,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Fatal errors terminate the invocation; everything else is reported
    /// and the command surface carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Authentication
                | ErrorKind::Configuration
                | ErrorKind::Cancelled
                | ErrorKind::ProtocolViolation
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<octoly_api::Error> for CoreError {
    fn from(err: octoly_api::Error) -> Self {
        match err {
            octoly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            octoly_api::Error::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key or access token".into(),
            },
            octoly_api::Error::Forbidden { message } => CoreError::PermissionDenied { message },
            octoly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            octoly_api::Error::InvalidUrl(e) => CoreError::Configuration {
                message: format!("Invalid server URL: {e}"),
            },
            octoly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            octoly_api::Error::NotFound { path } => CoreError::NotFound {
                entity: "resource".into(),
                identifier: path,
            },
            octoly_api::Error::Conflict { message } => CoreError::Conflict {
                entity: "resource".into(),
                name: message,
            },
            octoly_api::Error::Server {
                status,
                message,
                details,
            } => CoreError::Api {
                message: if details.is_empty() {
                    message
                } else {
                    format!("{message} ({})", details.join("; "))
                },
                status: Some(status),
            },
            octoly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(CoreError::Cancelled.is_fatal());
        assert!(CoreError::configuration("two criteria").is_fatal());
        assert!(
            CoreError::AmbiguousSpace {
                name: "Default".into(),
                matches: 2
            }
            .is_fatal()
        );
        assert!(
            !CoreError::NotFound {
                entity: "account".into(),
                identifier: "prod".into()
            }
            .is_fatal()
        );
        assert!(!CoreError::Timeout.is_fatal());
    }

    #[test]
    fn server_details_are_folded_into_message() {
        let err = CoreError::from(octoly_api::Error::Server {
            status: 400,
            message: "There was a problem with your request.".into(),
            details: vec!["Name is required".into()],
        });
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("Name is required"));
    }

    #[test]
    fn rejected_key_is_authentication() {
        let err = CoreError::from(octoly_api::Error::InvalidApiKey);
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.is_fatal());
    }
}
