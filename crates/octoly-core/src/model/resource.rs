use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::id::{ResourceId, ResourceKind};

/// A named, server-managed object that a `ScopedRepository` can hold.
///
/// Implementors round-trip through the server's JSON representation; any
/// field they don't model is kept in a flattened map so updates send it
/// back untouched.
pub trait Resource: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// `None` until the server has assigned one.
    fn id(&self) -> Option<&ResourceId>;

    fn name(&self) -> &str;
}

/// Whether a resource is scoped to specific tenants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum TenantedDeploymentMode {
    #[default]
    Untenanted,
    TenantedOrUntenanted,
    Tenanted,
}
