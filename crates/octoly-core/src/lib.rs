// octoly-core: command surface between octoly-api and the CLI.
//
// Resolves spaces, scopes repositories to them, validates selection
// requests and drives each command through a lifecycle that always
// releases its connection.

pub mod config;
pub mod connection;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod record;
pub mod remote;
pub mod repository;
pub mod selection;
pub mod space;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ConnectionConfig, TlsVerification};
pub use connection::{Connection, Connector, RemoteApi};
pub use error::{CoreError, ErrorKind};
pub use lifecycle::{
    Action, CommandLifecycle, Confirmation, Emitted, LifecycleState, Operation, Outcome,
    ResourceRef, Verb,
};
pub use record::{ErrorRecord, Fatal};
pub use remote::{HttpApi, HttpConnector};
pub use repository::ScopedRepository;
pub use selection::{FieldFilter, Selection, SelectionCriterion, SelectionRequest, Selector};
pub use space::resolve_space;

pub use model::{
    AccountResource, AzureServicePrincipalAccount, CertificateResource, LifecycleResource,
    Resource, ResourceId, ResourceKind, SensitiveValue, Space, TagSetResource,
    TenantedDeploymentMode, UserResource,
};
