use secrecy::SecretString;

/// Header carrying an Octopus API key (`API-XXXX...`).
pub const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

/// Credentials for authenticating with an Octopus server.
///
/// Each variant carries the secret material needed for its auth flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Long-lived API key generated from a user's profile page.
    ApiKey { key: SecretString },

    /// Short-lived bearer token (OIDC access token exchange).
    AccessToken { token: SecretString },
}

impl Credentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey {
            key: SecretString::from(key.into()),
        }
    }

    /// Short label for log lines; never includes secret material.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => "api-key",
            Self::AccessToken { .. } => "access-token",
        }
    }
}
