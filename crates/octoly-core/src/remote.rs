// ── HTTP adapter ──
//
// Binds the `RemoteApi`/`Connector` seams to `octoly_api::OctopusClient`.

use serde_json::Value;
use tracing::{debug, info};

use octoly_api::collections::collection_path;
use octoly_api::{Credentials, OctopusClient, TlsMode, TransportConfig};

use crate::config::{AuthCredentials, ConnectionConfig, TlsVerification};
use crate::connection::{Connection, Connector, RemoteApi};
use crate::error::CoreError;
use crate::model::{ResourceId, ResourceKind, Space};

/// Opens connections to a real server over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    config: ConnectionConfig,
}

impl HttpConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    fn build_client(&self) -> Result<OctopusClient, CoreError> {
        let credentials = match &self.config.credentials {
            AuthCredentials::ApiKey(key) => Credentials::ApiKey { key: key.clone() },
            AuthCredentials::AccessToken(token) => Credentials::AccessToken {
                token: token.clone(),
            },
        };
        let transport = TransportConfig {
            tls: match &self.config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.config.timeout,
        };
        Ok(OctopusClient::new(
            self.config.url.as_str(),
            &credentials,
            &transport,
        )?)
    }
}

impl Connector for HttpConnector {
    type Api = HttpApi;

    async fn connect(&self) -> Result<Connection<HttpApi>, CoreError> {
        let client = self.build_client()?;
        let user = client.current_user().await.map_err(|e| {
            if e.is_auth_failure() {
                CoreError::AuthenticationFailed {
                    message: e.to_string(),
                }
            } else {
                CoreError::from(e)
            }
        })?;
        info!(server = %client.base_url(), user = %user.username, "connected");
        Ok(Connection::new(
            HttpApi {
                client: Some(client),
            },
            self.describe(),
        ))
    }

    fn describe(&self) -> String {
        self.config.url.to_string()
    }
}

/// `RemoteApi` over a live `OctopusClient`.
#[derive(Debug)]
pub struct HttpApi {
    client: Option<OctopusClient>,
}

impl HttpApi {
    fn client(&self) -> Result<&OctopusClient, CoreError> {
        self.client.as_ref().ok_or(CoreError::ConnectionClosed)
    }
}

fn path(space: &Space, kind: ResourceKind) -> String {
    let scope = kind.is_space_scoped().then_some(space.id.as_str());
    collection_path(scope, kind.collection())
}

impl RemoteApi for HttpApi {
    async fn find_spaces(&self, name: &str) -> Result<Vec<Space>, CoreError> {
        let spaces = self.client()?.find_spaces(name).await?;
        Ok(spaces.into_iter().map(Space::from).collect())
    }

    async fn list(
        &self,
        space: &Space,
        kind: ResourceKind,
        partial_name: Option<&str>,
    ) -> Result<Vec<Value>, CoreError> {
        Ok(self
            .client()?
            .list_all(&path(space, kind), partial_name)
            .await?)
    }

    async fn create(
        &self,
        space: &Space,
        kind: ResourceKind,
        body: &Value,
    ) -> Result<Value, CoreError> {
        Ok(self.client()?.create_item(&path(space, kind), body).await?)
    }

    async fn update(
        &self,
        space: &Space,
        kind: ResourceKind,
        id: &ResourceId,
        body: &Value,
    ) -> Result<Value, CoreError> {
        Ok(self
            .client()?
            .update_item(&path(space, kind), id.as_str(), body)
            .await?)
    }

    async fn delete(
        &self,
        space: &Space,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<(), CoreError> {
        Ok(self
            .client()?
            .delete_item(&path(space, kind), id.as_str())
            .await?)
    }

    fn release(&mut self) -> Result<(), CoreError> {
        // Dropping the client tears down its connection pool.
        if self.client.take().is_some() {
            debug!("http client dropped");
        }
        Ok(())
    }
}
