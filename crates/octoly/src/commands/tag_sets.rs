//! Tag set command handlers.

use tabled::Tabled;

use octoly_core::{ResourceId, TagSetResource};

use crate::cli::ResourceArgs;
use crate::error::CliError;

use super::resources::{self, ResourceView};
use super::{Context, util};

#[derive(Tabled)]
pub struct TagSetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl ResourceView for TagSetResource {
    type Row = TagSetRow;

    fn row(&self) -> TagSetRow {
        TagSetRow {
            id: util::or_dash(self.id.as_ref().map(ResourceId::as_str)),
            name: self.name.clone(),
            tags: self.tag_names().collect::<Vec<_>>().join(", "),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:          {}", util::or_dash(self.id.as_ref().map(ResourceId::as_str))),
            format!("Name:        {}", self.name),
            format!("Description: {}", util::or_dash(self.description.as_deref())),
            format!("Tags:        {}", self.tags.len()),
        ];
        for tag in &self.tags {
            lines.push(format!("  {:<16} {}", tag.name, tag.color));
        }
        lines.join("\n")
    }
}

pub async fn handle(args: ResourceArgs, ctx: Context<'_>) -> Result<(), CliError> {
    resources::handle::<TagSetResource>(args.command, ctx).await
}
