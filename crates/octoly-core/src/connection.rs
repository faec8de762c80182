// ── Connection ──
//
// A `Connection` is an authenticated session with one server. Everything
// that touches the network goes through the `RemoteApi` it owns, so the
// lifecycle and repositories can be driven against an in-memory server in
// tests. Releasing the session happens exactly once: on `close()` or, if
// nobody called it, on drop.

use std::future::Future;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{ResourceId, ResourceKind, Space};

/// Raw resource operations against a server.
///
/// Bodies are passed as JSON so one implementation serves every resource
/// kind; typing happens in `ScopedRepository`.
pub trait RemoteApi: Send + Sync {
    /// Spaces whose name contains `name` (server-side partial match).
    fn find_spaces(&self, name: &str) -> impl Future<Output = Result<Vec<Space>, CoreError>> + Send;

    /// Every item of `kind` in `space`, optionally narrowed by partial name.
    fn list(
        &self,
        space: &Space,
        kind: ResourceKind,
        partial_name: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Value>, CoreError>> + Send;

    fn create(
        &self,
        space: &Space,
        kind: ResourceKind,
        body: &Value,
    ) -> impl Future<Output = Result<Value, CoreError>> + Send;

    fn update(
        &self,
        space: &Space,
        kind: ResourceKind,
        id: &ResourceId,
        body: &Value,
    ) -> impl Future<Output = Result<Value, CoreError>> + Send;

    fn delete(
        &self,
        space: &Space,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Drop network state. Called once per connection.
    fn release(&mut self) -> Result<(), CoreError>;
}

/// Opens authenticated connections.
pub trait Connector: Send + Sync {
    type Api: RemoteApi;

    /// Open a session and verify the credential before returning it.
    fn connect(&self) -> impl Future<Output = Result<Connection<Self::Api>, CoreError>> + Send;

    /// Server address, for logs and error targets.
    fn describe(&self) -> String;
}

// ── Connection ──────────────────────────────────────────────────────

pub struct Connection<A: RemoteApi> {
    api: A,
    server: String,
    released: bool,
}

impl<A: RemoteApi> Connection<A> {
    pub fn new(api: A, server: impl Into<String>) -> Self {
        Self {
            api,
            server: server.into(),
            released: false,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// The API handle, as long as the connection is open.
    pub fn api(&self) -> Result<&A, CoreError> {
        if self.released {
            return Err(CoreError::ConnectionClosed);
        }
        Ok(&self.api)
    }

    /// Release the session. Idempotent; release failures are logged and
    /// swallowed.
    pub fn close(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match self.api.release() {
            Ok(()) => debug!(server = %self.server, "connection released"),
            Err(e) => warn!(server = %self.server, error = %e, "connection release failed (ignored)"),
        }
    }
}

impl<A: RemoteApi> Drop for Connection<A> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<A: RemoteApi> std::fmt::Debug for Connection<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("server", &self.server)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::testing::FakeServer;

    #[test]
    fn close_releases_exactly_once() {
        let server = FakeServer::new();
        let mut conn = server.open();
        conn.close();
        conn.close();
        assert!(conn.is_released());
        drop(conn);
        assert_eq!(server.calls().releases, 1);
    }

    #[test]
    fn drop_releases_unclosed_connection() {
        let server = FakeServer::new();
        {
            let _conn = server.open();
        }
        assert_eq!(server.calls().releases, 1);
    }

    #[test]
    fn release_failure_is_swallowed() {
        let server = FakeServer::new().failing_release();
        let mut conn = server.open();
        conn.close();
        assert!(conn.is_released());
        assert_eq!(server.calls().releases, 1);
    }

    #[test]
    fn released_connection_rejects_calls() {
        let server = FakeServer::new();
        let mut conn = server.open();
        conn.close();
        assert!(matches!(
            conn.api(),
            Err(crate::error::CoreError::ConnectionClosed)
        ));
    }
}
