// ── Scoped repository ──
//
// Typed CRUD over one resource kind inside one resolved space. Borrows
// its connection, so it cannot outlive the session it was built from.

use std::marker::PhantomData;

use serde_json::Value;
use tracing::debug;

use crate::connection::{Connection, RemoteApi};
use crate::error::CoreError;
use crate::model::{Resource, ResourceId, ResourceKind, Space};
use crate::selection::Selector;

pub struct ScopedRepository<'c, A: RemoteApi, R: Resource> {
    api: &'c A,
    space: &'c Space,
    _resource: PhantomData<fn() -> R>,
}

impl<'c, A: RemoteApi, R: Resource> ScopedRepository<'c, A, R> {
    pub fn new(connection: &'c Connection<A>, space: &'c Space) -> Result<Self, CoreError> {
        Ok(Self {
            api: connection.api()?,
            space,
            _resource: PhantomData,
        })
    }

    pub fn space(&self) -> &Space {
        self.space
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Every resource of this kind in the space, as of the call.
    pub async fn find_all(&self) -> Result<Vec<R>, CoreError> {
        self.fetch(None).await
    }

    /// The resource whose name equals `name` (case-insensitive).
    pub async fn find_by_name(&self, name: &str) -> Result<R, CoreError> {
        self.fetch(Some(name))
            .await?
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| self.not_found(name))
    }

    /// Resources matching any of `names`, each at most once. Missing names
    /// are skipped.
    pub async fn find_by_names(&self, names: &[String]) -> Result<Vec<R>, CoreError> {
        let found: Vec<R> = self
            .fetch(None)
            .await?
            .into_iter()
            .filter(|r| names.iter().any(|n| r.name().eq_ignore_ascii_case(n)))
            .collect();

        for name in names {
            if !found.iter().any(|r| r.name().eq_ignore_ascii_case(name)) {
                debug!(kind = %R::KIND, name = %name, "name not present; skipped");
            }
        }
        Ok(found)
    }

    /// First resource the selector accepts, in server order.
    pub async fn find_one(&self, selector: &Selector<R>) -> Result<R, CoreError> {
        self.fetch(None)
            .await?
            .into_iter()
            .find(|r| selector.matches(r))
            .ok_or_else(|| self.not_found("<no match for filter>"))
    }

    pub async fn find_many(&self, selector: &Selector<R>) -> Result<Vec<R>, CoreError> {
        Ok(self
            .fetch(None)
            .await?
            .into_iter()
            .filter(|r| selector.matches(r))
            .collect())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Store a new resource; the returned copy carries its assigned id.
    pub async fn create(&self, resource: &R) -> Result<R, CoreError> {
        let body = encode(resource)?;
        let stored = self
            .api
            .create(self.space, R::KIND, &body)
            .await
            .map_err(|e| match e {
                CoreError::Conflict { .. } => CoreError::Conflict {
                    entity: R::KIND.label().into(),
                    name: resource.name().into(),
                },
                other => other,
            })?;
        decode(stored)
    }

    /// Replace the stored resource with the same id.
    pub async fn update(&self, resource: &R) -> Result<R, CoreError> {
        let id = resource.id().ok_or_else(|| CoreError::ValidationFailed {
            message: format!(
                "{} '{}' has no Id; fetch it before updating",
                R::KIND.label(),
                resource.name()
            ),
        })?;
        let body = encode(resource)?;
        let stored = self
            .api
            .update(self.space, R::KIND, id, &body)
            .await
            .map_err(|e| self.refine_not_found(e, id.as_str()))?;
        decode(stored)
    }

    pub async fn delete(&self, id: &ResourceId) -> Result<(), CoreError> {
        self.api
            .delete(self.space, R::KIND, id)
            .await
            .map_err(|e| self.refine_not_found(e, id.as_str()))
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn fetch(&self, partial_name: Option<&str>) -> Result<Vec<R>, CoreError> {
        let items = self.api.list(self.space, R::KIND, partial_name).await?;
        debug!(
            kind = %R::KIND,
            space = %self.space.id,
            count = items.len(),
            "fetched collection"
        );
        items.into_iter().map(decode).collect()
    }

    fn not_found(&self, identifier: &str) -> CoreError {
        CoreError::NotFound {
            entity: R::KIND.label().into(),
            identifier: format!("{identifier} (space '{}')", self.space.name),
        }
    }

    fn refine_not_found(&self, err: CoreError, identifier: &str) -> CoreError {
        match err {
            CoreError::NotFound { .. } => self.not_found(identifier),
            other => other,
        }
    }
}

fn encode<R: Resource>(resource: &R) -> Result<Value, CoreError> {
    serde_json::to_value(resource)
        .map_err(|e| CoreError::Internal(format!("encode {}: {e}", R::KIND.label())))
}

fn decode<R: Resource>(value: Value) -> Result<R, CoreError> {
    serde_json::from_value(value)
        .map_err(|e| CoreError::Internal(format!("malformed {} payload: {e}", R::KIND.label())))
}
