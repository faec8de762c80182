use thiserror::Error;

/// Top-level error type for the `octoly-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, server-reported errors, and payload decoding.
/// `octoly-core` maps these into its own error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials could not be turned into a request header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// API key or access token rejected by the server (HTTP 401).
    #[error("Invalid API key or access token")]
    InvalidApiKey,

    /// Authenticated, but not permitted (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// The addressed resource does not exist (HTTP 404).
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// The server refused a write because the name is taken.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Any other structured error from the server.
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        status: u16,
        message: String,
        details: Vec<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credential was rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::InvalidApiKey | Self::Forbidden { .. }
        )
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::NotFound { .. } => true,
            Self::Server { status: 404, .. } => true,
            _ => false,
        }
    }
}
