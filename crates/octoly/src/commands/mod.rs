pub mod accounts;
pub mod certificates;
pub mod config_cmd;
pub mod connect;
pub mod lifecycles;
pub mod resources;
pub mod tag_sets;
pub mod users;
pub mod util;

use tokio_util::sync::CancellationToken;

use crate::cli::{Command, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Everything a server-bound handler needs for one invocation.
pub struct Context<'a> {
    pub target: Target,
    pub global: &'a GlobalOpts,
    pub cancel: CancellationToken,
}

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    target: Target,
    global: &GlobalOpts,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let ctx = Context {
        target,
        global,
        cancel,
    };
    match cmd {
        Command::Accounts(args) => accounts::handle(args, ctx).await,
        Command::Certificates(args) => certificates::handle(args, ctx).await,
        Command::TagSets(args) => tag_sets::handle(args, ctx).await,
        Command::Lifecycles(args) => lifecycles::handle(args, ctx).await,
        Command::Users(args) => users::handle(args, ctx).await,
        Command::Connect => connect::handle(ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
