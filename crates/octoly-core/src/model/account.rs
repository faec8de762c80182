// ── Accounts ──
//
// Accounts hold credentials for cloud platforms and external services.
// The common shape is typed; kind-specific fields (client ids, keys,
// tokens) ride in `extra` so every account type round-trips.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{ResourceId, ResourceKind};
use super::resource::{Resource, TenantedDeploymentMode};
use super::sensitive::SensitiveValue;
use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    /// e.g. `AzureServicePrincipal`, `UsernamePassword`, `Token`.
    pub account_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default)]
    pub environment_ids: Vec<String>,
    #[serde(default)]
    pub tenant_ids: Vec<String>,
    #[serde(default)]
    pub tenant_tags: Vec<String>,
    #[serde(default)]
    pub tenanted_deployment_participation: TenantedDeploymentMode,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for AccountResource {
    const KIND: ResourceKind = ResourceKind::Account;

    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ── Azure service principal ─────────────────────────────────────────

/// Typed builder for an `AzureServicePrincipal` account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AzureServicePrincipalAccount {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub client_id: String,
    pub tenant_id: String,
    pub subscription_number: String,
    pub password: SensitiveValue,
    pub environment_ids: Vec<String>,
    pub tenant_ids: Vec<String>,
    pub tenant_tags: Vec<String>,
    pub tenanted_deployment_participation: TenantedDeploymentMode,
}

impl AzureServicePrincipalAccount {
    pub fn new(
        name: impl Into<String>,
        client_id: impl Into<String>,
        tenant_id: impl Into<String>,
        subscription_number: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            subscription_number: subscription_number.into(),
            password: SensitiveValue::new(secret),
            environment_ids: Vec::new(),
            tenant_ids: Vec::new(),
            tenant_tags: Vec::new(),
            tenanted_deployment_participation: TenantedDeploymentMode::Untenanted,
        }
    }

    /// Produce the generic account payload the repository works with.
    pub fn into_resource(self) -> Result<AccountResource, CoreError> {
        let mut value = serde_json::to_value(&self)
            .map_err(|e| CoreError::Internal(format!("encode account: {e}")))?;
        if let Value::Object(map) = &mut value {
            map.insert(
                "AccountType".into(),
                Value::String("AzureServicePrincipal".into()),
            );
        }
        serde_json::from_value(value)
            .map_err(|e| CoreError::Internal(format!("decode account: {e}")))
    }
}
