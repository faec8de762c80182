// octoly-api: Async Rust client for the Octopus Deploy REST API

pub mod auth;
pub mod client;
pub mod collections;
pub mod error;
pub mod models;
pub mod spaces;
pub mod transport;

pub use auth::Credentials;
pub use client::OctopusClient;
pub use error::Error;
pub use models::{ResourceCollection, SpaceResource, UserSummary};
pub use transport::{TlsMode, TransportConfig};
