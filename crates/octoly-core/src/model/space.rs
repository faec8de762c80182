use octoly_api::SpaceResource;
use serde::Serialize;

/// A named partition on the server. Most resources live inside exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
}

impl From<SpaceResource> for Space {
    fn from(s: SpaceResource) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            is_default: s.is_default,
        }
    }
}
