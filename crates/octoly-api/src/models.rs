// Wire types shared by every endpoint module.
//
// Octopus uses PascalCase JSON throughout. Only the fields this client
// relies on are typed; resource bodies stay as `serde_json::Value` and
// are given shape by `octoly-core`.

use serde::{Deserialize, Serialize};

/// One page of a collection endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceCollection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub items_per_page: u64,
}

/// A space as returned by `GET /api/spaces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpaceResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub task_queue_stopped: bool,
}

/// The subset of `GET /api/users/me` used to verify a credential.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_service: bool,
}

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn collection_tolerates_missing_paging_fields() {
        let page: ResourceCollection<SpaceResource> =
            serde_json::from_value(json!({ "Items": [] })).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn space_parses_pascal_case() {
        let space: SpaceResource = serde_json::from_value(json!({
            "Id": "Spaces-1",
            "Name": "Default",
            "IsDefault": true,
            "SpaceManagersTeams": ["teams-administrators"]
        }))
        .unwrap();
        assert_eq!(space.id, "Spaces-1");
        assert!(space.is_default);
        assert!(space.description.is_none());
    }
}
