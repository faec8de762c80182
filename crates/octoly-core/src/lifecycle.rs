// ── Command lifecycle ──
//
// One invocation of a resource command runs through a fixed sequence:
//
//   Created → Connected → SpaceResolved → Executing → Completed → Disposed
//
// with any step allowed to drop into Failed. Whatever happens, a
// connection that was opened is released exactly once before the
// lifecycle reaches Disposed. Failures come back in two flavours: a
// reported `ErrorRecord` inside `Outcome::Failed` (the command failed,
// the caller carries on) or a `Fatal` (the invocation is over).

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::connection::{Connection, Connector};
use crate::error::CoreError;
use crate::model::{Resource, ResourceId, ResourceKind, Space};
use crate::record::{ErrorRecord, Fatal};
use crate::repository::ScopedRepository;
use crate::selection::{Selection, SelectionCriterion, SelectionRequest};
use crate::space::resolve_space;

// ── Operation naming ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Verb {
    Get,
    New,
    Update,
    Remove,
    Test,
}

/// Verb-noun name of a command, e.g. `Get-Account`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    verb: Verb,
    noun: String,
}

impl Operation {
    pub fn new(verb: Verb, noun: impl Into<String>) -> Self {
        Self {
            verb,
            noun: noun.into(),
        }
    }

    pub fn for_kind(verb: Verb, kind: ResourceKind) -> Self {
        Self::new(verb, kind.to_string())
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// `GetAccount`; used as the prefix of error identifiers.
    pub fn compact(&self) -> String {
        format!("{}{}", self.verb, self.noun)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.verb, self.noun)
    }
}

// ── States and inputs ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LifecycleState {
    Created,
    Connected,
    SpaceResolved,
    Executing,
    Completed,
    Failed,
    Disposed,
}

/// Caller's answer to "apply this change?". Queries ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confirmation {
    Approved,
    #[default]
    Declined,
}

impl From<bool> for Confirmation {
    fn from(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Declined
        }
    }
}

/// How a command addresses a single existing resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Id(ResourceId),
    Name(String),
}

impl ResourceRef {
    /// Treat `raw` as an id when it has the id shape of `kind`
    /// (`Accounts-12`), otherwise as a name.
    pub fn parse(kind: ResourceKind, raw: &str) -> Self {
        if kind.looks_like_id(raw) {
            Self::Id(ResourceId::from(raw))
        } else {
            Self::Name(raw.to_owned())
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// What a command asks the lifecycle to do.
#[derive(Debug)]
pub enum Action<R> {
    Select(SelectionRequest<R>),
    Create(R),
    Update(R),
    Remove(ResourceRef),
}

/// What a successful command produced.
#[derive(Debug, Clone)]
pub enum Emitted<R> {
    Selected(Selection<R>),
    Created(R),
    Updated(R),
    Removed(ResourceId),
}

#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Completed(T),
    /// A mutation the caller did not confirm; nothing was changed.
    Declined,
    Failed(ErrorRecord),
}

// ── Validated plan ──────────────────────────────────────────────────

enum Plan<R> {
    Select(SelectionCriterion<R>),
    Create(R),
    Update(R),
    Remove(ResourceRef),
}

impl<R: Resource> Plan<R> {
    fn from_action(action: Action<R>) -> Result<Self, CoreError> {
        match action {
            Action::Select(request) => request.validate().map(Self::Select),
            Action::Create(resource) => Ok(Self::Create(resource)),
            Action::Update(resource) => Ok(Self::Update(resource)),
            Action::Remove(ResourceRef::Name(name)) if name.trim().is_empty() => Err(
                CoreError::configuration(format!("{} name must not be empty", R::KIND.label())),
            ),
            Action::Remove(target) => Ok(Self::Remove(target)),
        }
    }

    fn is_mutating(&self) -> bool {
        !matches!(self, Self::Select(_))
    }

    fn target(&self) -> String {
        let label = R::KIND.label();
        match self {
            Self::Select(criterion) => criterion.target(),
            Self::Create(r) | Self::Update(r) => format!("{label} '{}'", r.name()),
            Self::Remove(target) => format!("{label} {target}"),
        }
    }

    async fn execute<A: crate::connection::RemoteApi>(
        self,
        repo: &ScopedRepository<'_, A, R>,
        cancel: &CancellationToken,
    ) -> Result<Emitted<R>, CoreError> {
        match self {
            Self::Select(criterion) => {
                debug!(mode = criterion.mode(), "selecting");
                criterion.apply(repo).await.map(Emitted::Selected)
            }
            Self::Create(resource) => repo.create(&resource).await.map(Emitted::Created),
            Self::Update(resource) => repo.update(&resource).await.map(Emitted::Updated),
            Self::Remove(ResourceRef::Id(id)) => {
                repo.delete(&id).await?;
                Ok(Emitted::Removed(id))
            }
            Self::Remove(ResourceRef::Name(name)) => {
                let found = repo.find_by_name(&name).await?;
                let id = found.id().cloned().ok_or_else(|| {
                    CoreError::Internal(format!("{} '{name}' has no Id", R::KIND.label()))
                })?;
                if cancel.is_cancelled() {
                    return Err(CoreError::Cancelled);
                }
                repo.delete(&id).await?;
                Ok(Emitted::Removed(id))
            }
        }
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

pub struct CommandLifecycle<C: Connector> {
    operation: Operation,
    connector: C,
    space_name: String,
    confirmation: Confirmation,
    cancel: CancellationToken,
    transitions: Vec<LifecycleState>,
}

impl<C: Connector> CommandLifecycle<C> {
    pub fn new(operation: Operation, connector: C, space_name: impl Into<String>) -> Self {
        Self {
            operation,
            connector,
            space_name: space_name.into(),
            confirmation: Confirmation::default(),
            cancel: CancellationToken::new(),
            transitions: vec![LifecycleState::Created],
        }
    }

    #[must_use]
    pub fn with_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Observe `token` between steps; once cancelled the invocation ends
    /// with a fatal `Cancelled`.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn state(&self) -> LifecycleState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(LifecycleState::Created)
    }

    /// Every state entered so far, starting with `Created`.
    pub fn transitions(&self) -> &[LifecycleState] {
        &self.transitions
    }

    /// Run a resource action to completion.
    pub async fn run<R: Resource>(
        &mut self,
        action: Action<R>,
    ) -> Result<Outcome<Emitted<R>>, Fatal> {
        let collection = format!("{}s", R::KIND.label());
        self.ensure_fresh(&collection)?;

        let plan = match Plan::from_action(action) {
            Ok(plan) => plan,
            Err(e) => return Err(self.abort(&e, &collection)),
        };
        let target = plan.target();

        let mut connection = self.open().await?;
        let result = self.execute(&connection, plan, &target).await;
        connection.close();
        self.enter(LifecycleState::Disposed);
        result
    }

    /// Connect and resolve the space, then stop. Backs `connect`-style
    /// commands that only verify reachability and credentials.
    pub async fn probe(&mut self) -> Result<Outcome<Space>, Fatal> {
        let server = self.connector.describe();
        self.ensure_fresh(&server)?;

        let mut connection = self.open().await?;
        let result = match self.resolve(&connection).await {
            Ok(Ok(space)) => {
                self.enter(LifecycleState::Completed);
                Ok(Outcome::Completed(space))
            }
            Ok(Err(record)) => Ok(Outcome::Failed(record)),
            Err(fatal) => Err(fatal),
        };
        connection.close();
        self.enter(LifecycleState::Disposed);
        result
    }

    // ── Steps ────────────────────────────────────────────────────────

    async fn open(&mut self) -> Result<Connection<C::Api>, Fatal> {
        let server = self.connector.describe();
        if self.cancel.is_cancelled() {
            return Err(self.abort(&CoreError::Cancelled, &server));
        }
        match self.connector.connect().await {
            Ok(connection) => {
                self.enter(LifecycleState::Connected);
                Ok(connection)
            }
            Err(e) => Err(self.abort(&e, &server)),
        }
    }

    /// `Ok(Err(record))` is a reported failure; the connection stays open
    /// for the caller to release.
    async fn resolve(
        &mut self,
        connection: &Connection<C::Api>,
    ) -> Result<Result<Space, ErrorRecord>, Fatal> {
        let target = format!("space '{}'", self.space_name);
        self.checkpoint(&target)?;
        match resolve_space(connection, &self.space_name).await {
            Ok(space) => {
                debug!(space_id = %space.id, "space resolved");
                self.enter(LifecycleState::SpaceResolved);
                Ok(Ok(space))
            }
            Err(e) => self.settle(e, &target).map(Err),
        }
    }

    async fn execute<R: Resource>(
        &mut self,
        connection: &Connection<C::Api>,
        plan: Plan<R>,
        target: &str,
    ) -> Result<Outcome<Emitted<R>>, Fatal> {
        let space = match self.resolve(connection).await? {
            Ok(space) => space,
            Err(record) => return Ok(Outcome::Failed(record)),
        };
        self.checkpoint(target)?;

        let mutating = plan.is_mutating();
        if mutating && self.confirmation == Confirmation::Declined {
            info!(operation = %self.operation, subject = %target, "not confirmed; nothing changed");
            self.enter(LifecycleState::Completed);
            return Ok(Outcome::Declined);
        }

        self.enter(LifecycleState::Executing);
        let result = match ScopedRepository::<_, R>::new(connection, &space) {
            Ok(repo) => plan.execute(&repo, &self.cancel).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(emitted) => {
                if self.cancel.is_cancelled() {
                    if mutating {
                        warn!(
                            operation = %self.operation,
                            subject = %target,
                            "cancelled after the change was applied; it is not rolled back"
                        );
                    }
                    return Err(self.fatal(&CoreError::Cancelled, target));
                }
                self.enter(LifecycleState::Completed);
                Ok(Outcome::Completed(emitted))
            }
            Err(e) => self.settle(e, target).map(Outcome::Failed),
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn enter(&mut self, state: LifecycleState) {
        debug!(operation = %self.operation, %state, "lifecycle transition");
        self.transitions.push(state);
    }

    fn ensure_fresh(&self, target: &str) -> Result<(), Fatal> {
        if self.transitions.len() > 1 {
            let err = CoreError::configuration("a command lifecycle can only run once");
            return Err(Fatal::new(ErrorRecord::new(&self.operation, &err, target)));
        }
        Ok(())
    }

    fn checkpoint(&mut self, target: &str) -> Result<(), Fatal> {
        if self.cancel.is_cancelled() {
            return Err(self.fatal(&CoreError::Cancelled, target));
        }
        Ok(())
    }

    /// Classify a failure: fatal errors (and anything after cancellation)
    /// end the invocation, the rest become a reported record.
    fn settle(&mut self, err: CoreError, target: &str) -> Result<ErrorRecord, Fatal> {
        let err = if self.cancel.is_cancelled() {
            CoreError::Cancelled
        } else {
            err
        };
        if err.is_fatal() {
            return Err(self.fatal(&err, target));
        }
        let record = ErrorRecord::new(&self.operation, &err, target);
        warn!(error_id = %record.id, subject = %target, error = %err, "command failed");
        self.enter(LifecycleState::Failed);
        Ok(record)
    }

    fn fatal(&mut self, err: &CoreError, target: &str) -> Fatal {
        let record = ErrorRecord::new(&self.operation, err, target);
        error!(error_id = %record.id, subject = %target, error = %err, "command aborted");
        self.enter(LifecycleState::Failed);
        Fatal::new(record)
    }

    /// Fail before any connection exists: nothing to release.
    fn abort(&mut self, err: &CoreError, target: &str) -> Fatal {
        let fatal = self.fatal(err, target);
        self.enter(LifecycleState::Disposed);
        fatal
    }
}
