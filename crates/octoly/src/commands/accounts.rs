//! Account command handlers.

use secrecy::{ExposeSecret, SecretString};
use tabled::Tabled;

use octoly_core::{
    AccountResource, Action, AzureServicePrincipalAccount, ErrorRecord, Operation, ResourceId,
    ResourceKind, TenantedDeploymentMode, Verb,
};

use crate::cli::{AccountsArgs, AccountsCommand, AzureServicePrincipalArgs, TenantedParticipation};
use crate::error::CliError;

use super::resources::{self, ResourceView};
use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Tenanted")]
    tenanted: String,
    #[tabled(rename = "Environments")]
    environments: usize,
}

impl ResourceView for AccountResource {
    type Row = AccountRow;

    fn row(&self) -> AccountRow {
        AccountRow {
            id: util::or_dash(self.id.as_ref().map(ResourceId::as_str)),
            name: self.name.clone(),
            account_type: self.account_type.clone(),
            tenanted: self.tenanted_deployment_participation.to_string(),
            environments: self.environment_ids.len(),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:           {}", util::or_dash(self.id.as_ref().map(ResourceId::as_str))),
            format!("Name:         {}", self.name),
            format!("Type:         {}", self.account_type),
            format!("Description:  {}", util::or_dash(self.description.as_deref())),
            format!("Tenanted:     {}", self.tenanted_deployment_participation),
        ];
        if !self.environment_ids.is_empty() {
            lines.push(format!("Environments: {}", self.environment_ids.join(", ")));
        }
        if !self.tenant_ids.is_empty() {
            lines.push(format!("Tenants:      {}", self.tenant_ids.join(", ")));
        }
        if !self.tenant_tags.is_empty() {
            lines.push(format!("Tenant tags:  {}", self.tenant_tags.join(", ")));
        }
        lines.join("\n")
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: AccountsArgs, ctx: Context<'_>) -> Result<(), CliError> {
    match args.command {
        AccountsCommand::Common(command) => {
            resources::handle::<AccountResource>(command, ctx).await
        }
        AccountsCommand::NewAzureServicePrincipal(sp) => {
            let account = azure_service_principal(sp)?;
            resources::run(Action::Create(account), ctx).await
        }
    }
}

fn azure_service_principal(args: AzureServicePrincipalArgs) -> Result<AccountResource, CliError> {
    let secret = match args.secret {
        Some(secret) => SecretString::from(secret),
        None => SecretString::from(rpassword::prompt_password("Client secret: ")?),
    };
    if secret.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "secret".into(),
            reason: "client secret must not be empty".into(),
        });
    }

    let mut account = AzureServicePrincipalAccount::new(
        args.name,
        args.client_id,
        args.tenant_id,
        args.subscription_number,
        secret.expose_secret(),
    );
    account.description = args.description;
    account.environment_ids = args.environment_ids;
    account.tenant_ids = args.tenant_ids;
    account.tenant_tags = args.tenant_tags;
    account.tenanted_deployment_participation = participation(args.tenanted);

    let target = format!("account '{}'", account.name);
    account.into_resource().map_err(|e| {
        let operation = Operation::for_kind(Verb::New, ResourceKind::Account);
        ErrorRecord::new(&operation, &e, target).into()
    })
}

fn participation(value: TenantedParticipation) -> TenantedDeploymentMode {
    match value {
        TenantedParticipation::Untenanted => TenantedDeploymentMode::Untenanted,
        TenantedParticipation::TenantedOrUntenanted => TenantedDeploymentMode::TenantedOrUntenanted,
        TenantedParticipation::Tenanted => TenantedDeploymentMode::Tenanted,
    }
}
