//! Generic driver shared by every resource command.
//!
//! Turns parsed flags into a lifecycle `Action`, asks for confirmation
//! before anything that changes the server, runs the lifecycle and
//! renders what it emitted.

use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use octoly_core::{
    Action, CommandLifecycle, Confirmation, Emitted, ErrorRecord, FieldFilter, HttpConnector,
    Operation, Outcome, Resource, ResourceId, ResourceRef, Selection, SelectionRequest, Verb,
};

use crate::cli::{ResourceCommand, SelectArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

/// How a resource type shows up in tables and detail views.
pub trait ResourceView: Resource {
    type Row: Tabled;

    fn row(&self) -> Self::Row;

    fn detail(&self) -> String;
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<R: ResourceView>(
    command: ResourceCommand,
    ctx: Context<'_>,
) -> Result<(), CliError> {
    let action = match command {
        ResourceCommand::Get(select) => Action::Select(selection_request::<R>(select)?),
        ResourceCommand::New { from_file } => Action::Create(read_resource::<R>(&from_file)?),
        ResourceCommand::Update { from_file } => Action::Update(read_resource::<R>(&from_file)?),
        ResourceCommand::Remove { target } => Action::Remove(ResourceRef::parse(R::KIND, &target)),
    };
    run(action, ctx).await
}

/// Drive one action through a fresh lifecycle and render the result.
pub async fn run<R: ResourceView>(action: Action<R>, ctx: Context<'_>) -> Result<(), CliError> {
    let global = ctx.global;
    let operation = Operation::for_kind(verb_of(&action), R::KIND);
    let confirmation = confirmation_for(&action, &operation, global.yes)?;

    let mut lifecycle = CommandLifecycle::new(
        operation,
        HttpConnector::new(ctx.target.connection),
        ctx.target.space,
    )
    .with_confirmation(confirmation)
    .with_cancellation(ctx.cancel);

    let color = output::should_color(&global.color);
    match lifecycle.run(action).await? {
        Outcome::Completed(emitted) => render(emitted, global, color),
        Outcome::Declined => {
            output::print_notice(
                &format!("{} not confirmed; nothing changed", lifecycle.operation()),
                color,
                global.quiet,
            );
            Ok(())
        }
        Outcome::Failed(record) => Err(record.into()),
    }
}

fn verb_of<R>(action: &Action<R>) -> Verb {
    match action {
        Action::Select(_) => Verb::Get,
        Action::Create(_) => Verb::New,
        Action::Update(_) => Verb::Update,
        Action::Remove(_) => Verb::Remove,
    }
}

fn confirmation_for<R: Resource>(
    action: &Action<R>,
    operation: &Operation,
    yes: bool,
) -> Result<Confirmation, CliError> {
    let label = R::KIND.label();
    let prompt = match action {
        Action::Select(_) => return Ok(Confirmation::Declined),
        Action::Create(r) => format!("Create {label} '{}'?", r.name()),
        Action::Update(r) => format!("Update {label} '{}'?", r.name()),
        Action::Remove(target) => format!("Remove {label} {target}? This cannot be undone."),
    };
    util::confirm(&prompt, &operation.to_string(), yes).map(Confirmation::from)
}

// ── Input ───────────────────────────────────────────────────────────

/// Map `get` flags onto a selection request. Mode exclusivity is checked
/// by the lifecycle so every entry point reports it the same way; a bad
/// `--where` expression is reported under the same `Get{Kind}` operation.
pub fn selection_request<R: Resource>(args: SelectArgs) -> Result<SelectionRequest<R>, CliError> {
    let filters = args
        .filters
        .iter()
        .map(|raw| {
            raw.parse::<FieldFilter>().map_err(|e| {
                let operation = Operation::for_kind(Verb::Get, R::KIND);
                CliError::from(ErrorRecord::new(&operation, &e, format!("filter '{raw}'")))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SelectionRequest {
        all: args.all,
        name: args.name,
        names: args.names,
        first: args.first,
        many: args.many,
        selector: (!filters.is_empty()).then(|| FieldFilter::selector(filters)),
    })
}

fn read_resource<R: Resource>(path: &Path) -> Result<R, CliError> {
    let value = util::read_json_file(path)?;
    Ok(serde_json::from_value(value)?)
}

// ── Output ──────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Removed<'a> {
    id: &'a ResourceId,
}

fn id_of<R: Resource>(resource: &R) -> String {
    resource.id().map(ToString::to_string).unwrap_or_default()
}

fn render<R: ResourceView>(
    emitted: Emitted<R>,
    global: &crate::cli::GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let format = &global.output;
    let label = R::KIND.label();
    match emitted {
        Emitted::Selected(Selection::One(resource)) => {
            let out = output::render_single(format, &resource, R::detail, id_of)?;
            output::print_output(&out, global.quiet);
        }
        Emitted::Selected(Selection::Many(items)) => {
            let out = output::render_list(format, &items, R::row, id_of)?;
            output::print_output(&out, global.quiet);
        }
        Emitted::Created(resource) => {
            let out = output::render_single(format, &resource, R::detail, id_of)?;
            output::print_output(&out, global.quiet);
            output::print_status(
                &format!("Created {label} '{}' ({})", resource.name(), id_of(&resource)),
                color,
                global.quiet,
            );
        }
        Emitted::Updated(resource) => {
            let out = output::render_single(format, &resource, R::detail, id_of)?;
            output::print_output(&out, global.quiet);
            output::print_status(
                &format!("Updated {label} '{}'", resource.name()),
                color,
                global.quiet,
            );
        }
        Emitted::Removed(id) => {
            let out =
                output::render_single(format, &Removed { id: &id }, |_| String::new(), |r| {
                    r.id.to_string()
                })?;
            output::print_output(&out, global.quiet);
            output::print_status(&format!("Removed {label} {id}"), color, global.quiet);
        }
    }
    Ok(())
}
