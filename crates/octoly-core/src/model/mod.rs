// ── Domain model ──
//
// Typed views over the server's PascalCase resource bodies. Each resource
// keeps the fields it doesn't model in a flattened map, so a value read
// from the server can be edited and written back without loss.

pub mod id;
pub mod resource;
pub mod sensitive;
pub mod space;

pub mod account;
pub mod certificate;
pub mod lifecycle;
pub mod tag_set;
pub mod user;

// ── Re-exports ──────────────────────────────────────────────────────

pub use id::{ResourceId, ResourceKind};
pub use resource::{Resource, TenantedDeploymentMode};
pub use sensitive::SensitiveValue;
pub use space::Space;

pub use account::{AccountResource, AzureServicePrincipalAccount};
pub use certificate::CertificateResource;
pub use lifecycle::{LifecycleResource, Phase, RetentionPolicy};
pub use tag_set::{Tag, TagSetResource};
pub use user::UserResource;
