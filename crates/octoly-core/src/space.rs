// ── Space resolution ──
//
// The server's space query is a partial-name match, so a lookup for
// "Dev" may return "Dev", "Development" and "DevOps". Resolution keeps
// only exact (case-insensitive) name matches and insists on exactly one.

use tracing::debug;

use crate::connection::{Connection, RemoteApi};
use crate::error::CoreError;
use crate::model::Space;

/// Resolve a space name to the single space it denotes.
///
/// Zero matches is `SpaceNotFound`; more than one means the server broke
/// its own uniqueness guarantee and is reported as `AmbiguousSpace`.
pub async fn resolve_space<A: RemoteApi>(
    connection: &Connection<A>,
    name: &str,
) -> Result<Space, CoreError> {
    let candidates = connection.api()?.find_spaces(name).await?;
    debug!(space = name, candidates = candidates.len(), "space lookup");

    let mut matches: Vec<Space> = candidates
        .into_iter()
        .filter(|s| s.name.eq_ignore_ascii_case(name))
        .collect();

    match matches.len() {
        0 => Err(CoreError::SpaceNotFound { name: name.into() }),
        1 => matches.pop().ok_or_else(|| CoreError::Internal("space vanished".into())),
        n => Err(CoreError::AmbiguousSpace {
            name: name.into(),
            matches: n,
        }),
    }
}
