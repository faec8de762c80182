// In-memory server used by unit tests. Counts every call so tests can
// assert on side effects (connects, mutations, releases).

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::connection::{Connection, Connector, RemoteApi};
use crate::error::CoreError;
use crate::model::{ResourceId, ResourceKind, Space};

pub(crate) const SERVER: &str = "fake://octopus";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Calls {
    pub connects: usize,
    pub space_lookups: usize,
    pub lists: usize,
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
    pub releases: usize,
}

impl Calls {
    pub fn mutations(&self) -> usize {
        self.creates + self.updates + self.deletes
    }
}

struct Stored {
    scope: String,
    kind: ResourceKind,
    body: Value,
}

#[derive(Default)]
struct State {
    spaces: Vec<Space>,
    items: Vec<Stored>,
    next_id: u32,
    calls: Calls,
    release_fails: bool,
    connect_error: Option<fn() -> CoreError>,
    cancel_on_list: Option<CancellationToken>,
    cancel_on_create: Option<CancellationToken>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    state: Arc<Mutex<State>>,
}

fn name_field(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::User => "Username",
        _ => "Name",
    }
}

fn name_of(kind: ResourceKind, body: &Value) -> String {
    body.get(name_field(kind))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn scope_of(space: &Space, kind: ResourceKind) -> String {
    if kind.is_space_scoped() {
        space.id.clone()
    } else {
        String::new()
    }
}

impl FakeServer {
    /// A server with a single `Default` space (`Spaces-1`).
    pub fn new() -> Self {
        Self::default().with_space("Spaces-1", "Default")
    }

    pub fn with_space(self, id: &str, name: &str) -> Self {
        self.lock().spaces.push(Space {
            id: id.into(),
            name: name.into(),
            description: None,
            is_default: id == "Spaces-1",
        });
        self
    }

    pub fn failing_release(self) -> Self {
        self.lock().release_fails = true;
        self
    }

    pub fn failing_connect(self, error: fn() -> CoreError) -> Self {
        self.lock().connect_error = Some(error);
        self
    }

    /// Cancel `token` while a list call is in flight.
    pub fn cancel_during_list(self, token: CancellationToken) -> Self {
        self.lock().cancel_on_list = Some(token);
        self
    }

    /// Cancel `token` while a create call is in flight; the create still lands.
    pub fn cancel_during_create(self, token: CancellationToken) -> Self {
        self.lock().cancel_on_create = Some(token);
        self
    }

    /// Store a resource named `name` in `space_id`.
    pub fn seed(self, kind: ResourceKind, space_id: &str, name: &str) -> Self {
        {
            let mut state = self.lock();
            state.next_id += 1;
            let id = format!("{}-{}", kind.id_prefix(), state.next_id);
            let mut body = json!({ "Id": id });
            body[name_field(kind)] = Value::String(name.into());
            match kind {
                ResourceKind::Account => body["AccountType"] = json!("Token"),
                ResourceKind::User => {}
                _ => body["SpaceId"] = json!(space_id),
            }
            let scope = if kind.is_space_scoped() {
                space_id.to_owned()
            } else {
                String::new()
            };
            state.items.push(Stored { scope, kind, body });
        }
        self
    }

    pub fn calls(&self) -> Calls {
        self.lock().calls
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.lock().items.iter().filter(|s| s.kind == kind).count()
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector {
            server: self.clone(),
        }
    }

    /// An open connection, bypassing the connector.
    pub fn open(&self) -> Connection<FakeApi> {
        Connection::new(
            FakeApi {
                server: self.clone(),
            },
            SERVER,
        )
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

pub(crate) struct FakeConnector {
    server: FakeServer,
}

impl Connector for FakeConnector {
    type Api = FakeApi;

    async fn connect(&self) -> Result<Connection<FakeApi>, CoreError> {
        let error = {
            let mut state = self.server.lock();
            state.calls.connects += 1;
            state.connect_error
        };
        match error {
            Some(make) => Err(make()),
            None => Ok(self.server.open()),
        }
    }

    fn describe(&self) -> String {
        SERVER.into()
    }
}

pub(crate) struct FakeApi {
    server: FakeServer,
}

impl RemoteApi for FakeApi {
    async fn find_spaces(&self, name: &str) -> Result<Vec<Space>, CoreError> {
        let mut state = self.server.lock();
        state.calls.space_lookups += 1;
        let needle = name.to_lowercase();
        Ok(state
            .spaces
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        space: &Space,
        kind: ResourceKind,
        partial_name: Option<&str>,
    ) -> Result<Vec<Value>, CoreError> {
        let mut state = self.server.lock();
        state.calls.lists += 1;
        if let Some(token) = &state.cancel_on_list {
            token.cancel();
        }
        let scope = scope_of(space, kind);
        let needle = partial_name.map(str::to_lowercase);
        Ok(state
            .items
            .iter()
            .filter(|s| s.kind == kind && s.scope == scope)
            .filter(|s| {
                needle
                    .as_ref()
                    .is_none_or(|n| name_of(kind, &s.body).to_lowercase().contains(n))
            })
            .map(|s| s.body.clone())
            .collect())
    }

    async fn create(
        &self,
        space: &Space,
        kind: ResourceKind,
        body: &Value,
    ) -> Result<Value, CoreError> {
        let mut state = self.server.lock();
        state.calls.creates += 1;
        let scope = scope_of(space, kind);
        let name = name_of(kind, body);
        let taken = state.items.iter().any(|s| {
            s.kind == kind && s.scope == scope && name_of(kind, &s.body).eq_ignore_ascii_case(&name)
        });
        if taken {
            return Err(CoreError::Conflict {
                entity: "resource".into(),
                name,
            });
        }
        state.next_id += 1;
        let mut stored = body.clone();
        stored["Id"] = json!(format!("{}-{}", kind.id_prefix(), state.next_id));
        if kind.is_space_scoped() {
            stored["SpaceId"] = json!(space.id);
        }
        state.items.push(Stored {
            scope,
            kind,
            body: stored.clone(),
        });
        if let Some(token) = &state.cancel_on_create {
            token.cancel();
        }
        Ok(stored)
    }

    async fn update(
        &self,
        space: &Space,
        kind: ResourceKind,
        id: &ResourceId,
        body: &Value,
    ) -> Result<Value, CoreError> {
        let mut state = self.server.lock();
        state.calls.updates += 1;
        let scope = scope_of(space, kind);
        let slot = state.items.iter_mut().find(|s| {
            s.kind == kind && s.scope == scope && s.body["Id"].as_str() == Some(id.as_str())
        });
        match slot {
            Some(stored) => {
                stored.body = body.clone();
                stored.body["Id"] = json!(id.as_str());
                Ok(stored.body.clone())
            }
            None => Err(CoreError::NotFound {
                entity: "resource".into(),
                identifier: id.to_string(),
            }),
        }
    }

    async fn delete(
        &self,
        space: &Space,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<(), CoreError> {
        let mut state = self.server.lock();
        state.calls.deletes += 1;
        let scope = scope_of(space, kind);
        let before = state.items.len();
        state.items.retain(|s| {
            !(s.kind == kind && s.scope == scope && s.body["Id"].as_str() == Some(id.as_str()))
        });
        if state.items.len() == before {
            return Err(CoreError::NotFound {
                entity: "resource".into(),
                identifier: id.to_string(),
            });
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), CoreError> {
        let mut state = self.server.lock();
        state.calls.releases += 1;
        if state.release_fails {
            return Err(CoreError::Internal("socket already gone".into()));
        }
        Ok(())
    }
}
