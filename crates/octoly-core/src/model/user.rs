use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{ResourceId, ResourceKind};
use super::resource::Resource;

/// A server-wide user account. Users are not partitioned by space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub is_service: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn active_by_default() -> bool {
    true
}

impl Resource for UserResource {
    const KIND: ResourceKind = ResourceKind::User;

    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    /// Users are addressed by username.
    fn name(&self) -> &str {
        &self.username
    }
}
