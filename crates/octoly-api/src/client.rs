// Hand-crafted async HTTP client for the Octopus Deploy REST API.
//
// Base path: {server}/api/
// Auth: X-Octopus-ApiKey header, or a bearer token

use std::future::Future;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{API_KEY_HEADER, Credentials};
use crate::error::Error;
use crate::models::{ErrorResponse, ResourceCollection, UserSummary};
use crate::transport::TransportConfig;

/// Default page size for collection walks.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Octopus REST API.
///
/// Every path handed to the verb helpers is relative to `{server}/api/`,
/// e.g. `"spaces"` or `"Spaces-1/accounts"`.
#[derive(Debug, Clone)]
pub struct OctopusClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OctopusClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from credentials and a transport config.
    ///
    /// Injects the credential as a sensitive default header on every
    /// request. No request is made here; call
    /// [`current_user()`](Self::current_user) to verify the credential.
    pub fn new(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        match credentials {
            Credentials::ApiKey { key } => {
                let mut value = header_value(key.expose_secret())?;
                value.set_sensitive(true);
                headers.insert(API_KEY_HEADER, value);
            }
            Credentials::AccessToken { token } => {
                let mut value = header_value(&format!("Bearer {}", token.expose_secret()))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;
        debug!(url = %base_url, auth = credentials.describe(), "octopus client ready");

        Ok(Self { http, base_url })
    }

    /// Resolve the `/api/` root, accepting the server URL with or without it.
    ///
    /// `https://octopus.example.com` and `https://octopus.example.com/api`
    /// both become `https://octopus.example.com/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    /// The normalized `/api/` root every request is relative to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            trace!(bytes = body.len(), "response body received");
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let path = resp.url().path().to_owned();
        let raw = resp.text().await.unwrap_or_default();
        let body: ErrorResponse = serde_json::from_str(&raw).unwrap_or_default();
        let message = body.error_message.clone().unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw.chars().take(200).collect()
            }
        });

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::InvalidApiKey,
            reqwest::StatusCode::FORBIDDEN => Error::Forbidden { message },
            reqwest::StatusCode::NOT_FOUND => Error::NotFound { path },
            reqwest::StatusCode::CONFLICT => Error::Conflict { message },
            reqwest::StatusCode::BAD_REQUEST if names_in_use(&message, &body.errors) => {
                Error::Conflict { message }
            }
            _ => Error::Server {
                status: status.as_u16(),
                message,
                details: body.errors,
            },
        }
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// Walk a skip/take collection until every item has been read.
    ///
    /// Stops on a short or empty page, or once `TotalResults` items
    /// have been collected.
    pub async fn paginate_all<T, F, Fut>(&self, take: u64, fetch: F) -> Result<Vec<T>, Error>
    where
        F: Fn(u64, u64) -> Fut,
        Fut: Future<Output = Result<ResourceCollection<T>, Error>>,
    {
        let mut all = Vec::new();
        let mut skip: u64 = 0;

        loop {
            let page = fetch(skip, take).await?;
            let received = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
            all.extend(page.items);

            let collected = u64::try_from(all.len()).unwrap_or(u64::MAX);
            if received == 0 || received < take || collected >= page.total_results {
                break;
            }

            skip += received;
        }

        Ok(all)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// The user the credential belongs to.
    ///
    /// `GET /api/users/me`; fails with [`Error::InvalidApiKey`] for a bad key.
    pub async fn current_user(&self) -> Result<UserSummary, Error> {
        self.get("users/me").await
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(raw).map_err(|e| Error::Authentication {
        message: format!("invalid credential header value: {e}"),
    })
}

/// Octopus reports duplicate names as HTTP 400 with a validation message.
fn names_in_use(message: &str, details: &[String]) -> bool {
    std::iter::once(message)
        .chain(details.iter().map(String::as_str))
        .any(|m| m.to_ascii_lowercase().contains("already in use"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_segment() {
        let url = OctopusClient::normalize_base_url("https://octopus.example.com").unwrap();
        assert_eq!(url.as_str(), "https://octopus.example.com/api/");
    }

    #[test]
    fn base_url_keeps_existing_api_segment() {
        let url = OctopusClient::normalize_base_url("https://host/octopus/api/").unwrap();
        assert_eq!(url.as_str(), "https://host/octopus/api/");
    }

    #[test]
    fn base_url_rejects_garbage() {
        assert!(matches!(
            OctopusClient::normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn duplicate_name_messages_are_detected() {
        assert!(names_in_use(
            "There was a problem with your request.",
            &["The account name 'prod' is already in use.".into()]
        ));
        assert!(!names_in_use("Name is required", &[]));
    }

    #[test]
    fn api_key_header_is_accepted() {
        let creds = Credentials::api_key("API-TESTKEY");
        OctopusClient::new("https://host", &creds, &TransportConfig::default()).unwrap();
    }

    #[test]
    fn newline_in_key_is_an_auth_error() {
        let creds = Credentials::api_key("API-BAD\nKEY");
        let err = OctopusClient::new("https://host", &creds, &TransportConfig::default())
            .unwrap_err();
        assert!(err.is_auth_failure());
    }
}
