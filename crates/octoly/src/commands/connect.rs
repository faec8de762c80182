//! `octoly connect`: open a session, resolve the space, release.

use octoly_core::{CommandLifecycle, HttpConnector, Operation, Outcome, Space, Verb};
use serde::Serialize;

use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Connected<'a> {
    server: &'a str,
    space: &'a Space,
}

pub async fn handle(ctx: Context<'_>) -> Result<(), CliError> {
    let global = ctx.global;
    let server = ctx.target.connection.url.to_string();

    let mut lifecycle = CommandLifecycle::new(
        Operation::new(Verb::Test, "Connection"),
        HttpConnector::new(ctx.target.connection),
        ctx.target.space,
    )
    .with_cancellation(ctx.cancel);

    match lifecycle.probe().await? {
        Outcome::Completed(space) => {
            let connected = Connected {
                server: &server,
                space: &space,
            };
            let out = output::render_single(&global.output, &connected, detail, |c| {
                c.space.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Outcome::Failed(record) => Err(record.into()),
        // probe never mutates, so there is nothing to decline
        Outcome::Declined => Ok(()),
    }
}

fn detail(c: &Connected<'_>) -> String {
    [
        format!("Server:  {}", c.server),
        format!("Space:   {} ({})", c.space.name, c.space.id),
        format!("Default: {}", c.space.is_default),
    ]
    .join("\n")
}
