//! User command handlers. Users are server-wide.

use tabled::Tabled;

use octoly_core::{ResourceId, UserResource};

use crate::cli::ResourceArgs;
use crate::error::CliError;

use super::resources::{self, ResourceView};
use super::{Context, util};

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Display name")]
    display_name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Active")]
    active: bool,
    #[tabled(rename = "Service")]
    service: bool,
}

impl ResourceView for UserResource {
    type Row = UserRow;

    fn row(&self) -> UserRow {
        UserRow {
            id: util::or_dash(self.id.as_ref().map(ResourceId::as_str)),
            username: self.username.clone(),
            display_name: util::or_dash(self.display_name.as_deref()),
            email: util::or_dash(self.email_address.as_deref()),
            active: self.is_active,
            service: self.is_service,
        }
    }

    fn detail(&self) -> String {
        [
            format!("ID:       {}", util::or_dash(self.id.as_ref().map(ResourceId::as_str))),
            format!("Username: {}", self.username),
            format!("Name:     {}", util::or_dash(self.display_name.as_deref())),
            format!("Email:    {}", util::or_dash(self.email_address.as_deref())),
            format!("Active:   {}", self.is_active),
            format!("Service:  {}", self.is_service),
        ]
        .join("\n")
    }
}

pub async fn handle(args: ResourceArgs, ctx: Context<'_>) -> Result<(), CliError> {
    resources::handle::<UserResource>(args.command, ctx).await
}
