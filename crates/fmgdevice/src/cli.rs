//! Clap derive structures for the `fmgdevice` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fmgdevice -- manage FortiGate configuration through FortiManager
#[derive(Debug, Parser)]
#[command(
    name = "fmgdevice",
    version,
    about = "Manage FortiManager device configuration from the command line",
    long_about = "Create, read, update and delete device-level configuration objects\n\
        (router, firewall, switch-controller, system, user) on FortiGates\n\
        managed by FortiManager, through its JSON-RPC API.",
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
    /// FortiManager profile to use
    #[arg(long, short = 'p', env = "FMG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// FortiManager URL (overrides profile)
    #[arg(long, env = "FMG_URL", global = true)]
    pub url: Option<String>,

    /// ADOM for workspace locking (overrides profile)
    #[arg(long, env = "FMG_ADOM", global = true)]
    pub adom: Option<String>,

    /// Default managed device (overrides profile)
    #[arg(long, env = "FMG_DEVICE", global = true)]
    pub device: Option<String>,

    /// Default VDOM (overrides profile)
    #[arg(long, env = "FMG_VDOM", global = true)]
    pub vdom: Option<String>,

    /// API token
    #[arg(long, env = "FMG_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FMG_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FMG_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile and [defaults])
    #[arg(long, env = "FMG_TIMEOUT", global = true)]
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
    /// Plain text, one value per line (scripting)
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

/// Sub-table ordering applied when flattening.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortMode {
    False,
    True,
    Natural,
    Alphabetical,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List resource types and their schemas
    #[command(alias = "res")]
    Resources(ResourcesArgs),

    /// Refresh a state document from FortiManager
    Read(StateArgs),

    /// Create (no ID) or update (with ID) the object a state file describes
    Apply(StateArgs),

    /// Adopt an existing object into a new state document
    Import(ImportArgs),

    /// Delete the object a state file describes
    #[command(alias = "rm")]
    Delete(StateArgs),

    /// Convert a state document to the FortiManager wire shape (offline)
    Expand(ExpandArgs),

    /// Convert a FortiManager object to a state document (offline)
    Flatten(FlattenArgs),

    /// Show FortiManager system status
    Status,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List shipped resource types
    #[command(alias = "ls")]
    List,

    /// Show the field schema of a resource type
    Schema {
        /// Resource type (e.g. router_static or fmgdevice_router_static)
        resource: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CRUD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StateArgs {
    /// Resource type
    pub resource: String,

    /// State document (JSON): `{"id": ..., "attributes": {...}}` or bare attributes
    #[arg(long, short = 'F', value_name = "FILE")]
    pub from_file: PathBuf,

    /// Write the resulting state back to the file
    #[arg(long, short = 'w')]
    pub write: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Resource type
    pub resource: String,

    /// Object key (ignored for singletons)
    #[arg(default_value = "")]
    pub key: String,

    /// Extra state attribute, e.g. a parent key (repeatable)
    #[arg(long = "set", value_name = "ATTR=VALUE")]
    pub set: Vec<String>,

    /// Write the imported state to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub to_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OFFLINE CONVERSIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Resource type
    pub resource: String,

    /// State document or bare attributes (JSON)
    #[arg(long, short = 'F', value_name = "FILE")]
    pub from_file: PathBuf,
}

#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// Resource type
    pub resource: String,

    /// FortiManager object (JSON)
    #[arg(long, short = 'F', value_name = "FILE")]
    pub from_file: PathBuf,

    /// Prior state, consulted for sensitive fields and row matching
    #[arg(long, value_name = "FILE")]
    pub prior: Option<PathBuf>,

    /// Sub-table ordering (overrides dynamic_sort_subtable in the prior state)
    #[arg(long, value_enum)]
    pub sort: Option<SortMode>,
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
    /// Interactive configuration wizard
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (e.g. url, device_name, workspace_mode)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the active profile's password or API token in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
