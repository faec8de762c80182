use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{ResourceId, ResourceKind};
use super::resource::Resource;

/// A named group of tags used to classify tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagSetResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Hex colour, e.g. `#333333`.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    /// `TagSetName/TagName`, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_tag_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TagSetResource {
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

impl Resource for TagSetResource {
    const KIND: ResourceKind = ResourceKind::TagSet;

    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
