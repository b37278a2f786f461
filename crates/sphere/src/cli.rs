//! Clap derive structures for the `sphere` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sphere -- manage Conference Sphere publications from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "sphere",
    version,
    about = "Manage conference and journal publications from the command line",
    long_about = "A client for the Conference Sphere publications service.\n\n\
        Every change is confirmed by the server and followed by a fresh\n\
        listing, so what you see is always what the server holds.",
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
    /// Service profile to use
    #[arg(long, short = 'p', env = "SPHERE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Publications API base URL (overrides profile)
    #[arg(long, env = "SPHERE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides profile)
    #[arg(
        long,
        env = "SPHERE_TOKEN",
        global = true,
        hide_env_values = true,
        conflicts_with = "api_key"
    )]
    pub token: Option<String>,

    /// Service API key, sent as an API-Key header (overrides profile)
    #[arg(long, env = "SPHERE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SPHERE_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SPHERE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SPHERE_TIMEOUT", global = true)]
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
    /// Plain text, one uuid per line (scripting)
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
    /// List publications, optionally filtered by title
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single publication
    #[command(alias = "get")]
    Show(ShowArgs),

    /// Create a publication
    Create(CreateArgs),

    /// Replace a publication's fields, keeping unspecified ones
    #[command(alias = "edit")]
    Update(UpdateArgs),

    /// Delete a publication
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Delete publications whose conference date has passed
    PurgeExpired(PurgeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Publication commands ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive title filter
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Publication uuid
    pub uuid: String,
}

/// Publication field values. Dates are `YYYY-MM-DD`.
#[derive(Debug, Args, Default)]
pub struct FieldArgs {
    /// Title
    #[arg(long)]
    pub title: Option<String>,

    /// Publication type (Conference, Journal, ...)
    #[arg(long = "type", value_name = "TYPE")]
    pub publication_type: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Location
    #[arg(long)]
    pub location: Option<String>,

    /// Paper submission deadline (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub submission_date: Option<String>,

    /// Conference date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub conference_date: Option<String>,

    /// External link (call for papers, venue site)
    #[arg(long)]
    pub link: Option<String>,

    /// Conference rank (e.g. A, A*)
    #[arg(long)]
    pub rank: Option<String>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Publication uuid
    pub uuid: String,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Clear the external link
    #[arg(long, conflicts_with = "link")]
    pub clear_link: bool,

    /// Clear the conference rank
    #[arg(long, conflicts_with = "rank")]
    pub clear_rank: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Publication uuid
    pub uuid: String,
}

#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Treat this date as today (YYYY-MM-DD); defaults to the local date
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,

    /// Only list what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile's token in the system keyring
    SetToken {
        /// Profile to store the token for (defaults to the active profile)
        #[arg(long)]
        for_profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
