// ── Runtime connection configuration ──
//
// These types describe *how* to reach an Octopus server. They carry
// credential data and connection tuning, but never touch disk.
// The CLI constructs a `ConnectionConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the server.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// `API-XXXX` key sent as `X-Octopus-ApiKey`.
    ApiKey(SecretString),
    /// Bearer token (OIDC / service account exchange).
    AccessToken(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single server.
///
/// Built by the CLI, passed to `HttpConnector` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server URL (e.g., `https://octopus.example.com`).
    pub url: Url,
    pub credentials: AuthCredentials,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(url: Url, credentials: AuthCredentials) -> Self {
        Self {
            url,
            credentials,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
