//! Clap derive structures for the `octoly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// octoly -- manage Octopus Deploy resources from the command line
#[derive(Debug, Parser)]
#[command(
    name = "octoly",
    version,
    about = "Manage Octopus Deploy resources from the command line",
    long_about = "Query, create, update and remove Octopus Deploy accounts, certificates,\n\
        tag sets, lifecycles and users.\n\n\
        Every command opens one authenticated session, resolves the target space\n\
        by exact name, does its work, and releases the session.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "OCTOLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Octopus server URL (overrides profile)
    #[arg(long, short = 'S', env = "OCTOPUS_URL", global = true)]
    pub server: Option<String>,

    /// Space name [default: Default]
    #[arg(long, short = 's', env = "OCTOPUS_SPACE", global = true)]
    pub space: Option<String>,

    /// API key (API-XXXX)
    #[arg(long, env = "OCTOPUS_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OCTOLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Apply changes without asking for confirmation
    #[arg(long, short = 'y', alias = "force", global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "OCTOLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: profile or 30]
    #[arg(long, env = "OCTOLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage accounts (cloud and service credentials)
    #[command(alias = "account", alias = "acct")]
    Accounts(AccountsArgs),

    /// Manage certificates
    #[command(alias = "certificate", alias = "certs")]
    Certificates(ResourceArgs),

    /// Manage tag sets
    #[command(alias = "tagsets", alias = "tags")]
    TagSets(ResourceArgs),

    /// Manage lifecycles
    #[command(alias = "lifecycle", alias = "lc")]
    Lifecycles(ResourceArgs),

    /// Manage users (server-wide)
    #[command(alias = "user")]
    Users(ResourceArgs),

    /// Verify the server, credential and space, then disconnect
    Connect,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared resource commands ─────────────────────────────────────────

/// How `get` picks resources. Exactly one mode must be given.
#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Every resource in the space
    #[arg(long)]
    pub all: bool,

    /// The resource with this exact name
    #[arg(long, short = 'n', value_name = "NAME")]
    pub name: Option<String>,

    /// Resources with any of these names (comma separated); missing names are skipped
    #[arg(long, value_delimiter = ',', num_args = 1.., value_name = "NAME,...")]
    pub names: Option<Vec<String>>,

    /// The first resource matching every --where filter
    #[arg(long)]
    pub first: bool,

    /// Every resource matching every --where filter
    #[arg(long)]
    pub many: bool,

    /// Filter for --first/--many: FIELD=V, FIELD!=V, FIELD~=V (contains), FIELD^=V (prefix)
    #[arg(long = "where", short = 'w', value_name = "FILTER")]
    pub filters: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// Query resources
    #[command(alias = "ls", alias = "list")]
    Get(SelectArgs),

    /// Create a resource from a JSON file
    #[command(alias = "create")]
    New {
        /// JSON document in the server's resource shape
        #[arg(long, short = 'F', value_name = "PATH")]
        from_file: PathBuf,
    },

    /// Replace a resource from a JSON file (must carry its Id)
    Update {
        #[arg(long, short = 'F', value_name = "PATH")]
        from_file: PathBuf,
    },

    /// Remove a resource by name or id
    #[command(alias = "rm", alias = "delete")]
    Remove {
        /// Name, or id such as Accounts-12
        target: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    #[command(flatten)]
    Common(ResourceCommand),

    /// Create an Azure service principal account
    #[command(name = "new-azure-sp")]
    NewAzureServicePrincipal(AzureServicePrincipalArgs),
}

#[derive(Debug, Args)]
pub struct AzureServicePrincipalArgs {
    /// Account name
    #[arg(long)]
    pub name: String,

    /// Application (client) id
    #[arg(long)]
    pub client_id: String,

    /// Directory (tenant) id
    #[arg(long)]
    pub tenant_id: String,

    /// Azure subscription id
    #[arg(long = "subscription")]
    pub subscription_number: String,

    /// Client secret; prompted for when omitted
    #[arg(long, env = "OCTOLY_AZURE_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Environment ids the account may be used in (repeatable)
    #[arg(long = "environment", value_name = "ID")]
    pub environment_ids: Vec<String>,

    /// Tenant ids (repeatable)
    #[arg(long = "tenant", value_name = "ID")]
    pub tenant_ids: Vec<String>,

    /// Tenant tags, e.g. Region/EU (repeatable)
    #[arg(long = "tenant-tag", value_name = "TAG")]
    pub tenant_tags: Vec<String>,

    /// Tenanted deployment participation
    #[arg(long, default_value = "untenanted")]
    pub tenanted: TenantedParticipation,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TenantedParticipation {
    Untenanted,
    TenantedOrUntenanted,
    Tenanted,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Profile key: server, space, api_key_env, insecure, timeout, ca_cert
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API key in the system keyring
    SetApiKey {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
