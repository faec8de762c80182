use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{ResourceId, ResourceKind};
use super::resource::Resource;

/// A promotion path: the ordered phases a release moves through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_retention_policy: Option<RetentionPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tentacle_retention_policy: Option<RetentionPolicy>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Phase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub automatic_deployment_targets: Vec<String>,
    #[serde(default)]
    pub optional_deployment_targets: Vec<String>,
    #[serde(default)]
    pub minimum_environments_before_promotion: u32,
    #[serde(default)]
    pub is_optional_phase: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetentionPolicy {
    /// `Days` or `Items`.
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub quantity_to_keep: u32,
    #[serde(default)]
    pub should_keep_forever: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RetentionPolicy {
    pub fn summary(&self) -> String {
        if self.should_keep_forever {
            "forever".into()
        } else {
            format!("{} {}", self.quantity_to_keep, self.unit.to_lowercase())
        }
    }
}

impl Resource for LifecycleResource {
    const KIND: ResourceKind = ResourceKind::Lifecycle;

    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn retention_summary() {
        let keep: RetentionPolicy = serde_json::from_value(json!({
            "Unit": "Days", "QuantityToKeep": 30, "ShouldKeepForever": false
        }))
        .unwrap();
        assert_eq!(keep.summary(), "30 days");

        let forever: RetentionPolicy =
            serde_json::from_value(json!({ "ShouldKeepForever": true })).unwrap();
        assert_eq!(forever.summary(), "forever");
    }
}
