//! Clap derive structures for the `labkeep` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This file
//! is also compiled by `build.rs` for man pages, so it depends on clap only.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// labkeep -- keep track of lab machines, students, and upkeep tasks
#[derive(Debug, Parser)]
#[command(
    name = "labkeep",
    version,
    about = "Manage school computer labs from the command line",
    long_about = "Client for the lab-management service.\n\n\
        Reads (labs, machines, students, sessions) use the shared access key;\n\
        writes and task lists also need a signed-in account (`labkeep login`).",
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
    /// Profile to use
    #[arg(long, short = 'p', env = "LABKEEP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, env = "LABKEEP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Shared access key sent as the `api-key` header
    #[arg(long, env = "LABKEEP_ACCESS_KEY", global = true, hide_env = true)]
    pub access_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LABKEEP_OUTPUT",
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

    /// Emit logs as JSON lines on stderr
    #[arg(long, env = "LABKEEP_LOG_JSON", global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LABKEEP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LABKEEP_TIMEOUT", global = true)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session for this profile
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami {
        /// Re-read the profile from the server
        #[arg(long)]
        refresh: bool,
    },

    /// Create a new account
    Register(RegisterArgs),

    /// Labs you belong to, and lab administration
    #[command(alias = "lab", alias = "l")]
    Labs(LabsArgs),

    /// Machines, their condition, and their history
    #[command(alias = "machine", alias = "m")]
    Machines(MachinesArgs),

    /// Upkeep tasks
    #[command(alias = "task", alias = "t")]
    Tasks(TasksArgs),

    /// Usage session history
    Sessions(SessionsArgs),

    /// Students
    Students(StudentsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username, else prompts)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username for the new account (prompts when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LABS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LabsArgs {
    #[command(subcommand)]
    pub command: LabsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LabsCommand {
    /// List the labs you belong to
    #[command(alias = "ls")]
    List,

    /// Lab details, counters, and a preview of pending tasks
    Show {
        /// Lab ID
        lab_id: String,
    },

    /// Create a lab
    Create {
        /// Lab ID (immutable once created)
        lab_id: String,

        /// Display name
        #[arg(long, short = 'n')]
        name: String,

        /// Class codes (repeat or comma-separate)
        #[arg(long = "class", short = 'c', value_delimiter = ',')]
        classes: Vec<String>,
    },

    /// Rename a lab or replace its classes
    Update {
        /// Lab ID
        lab_id: String,

        /// New display name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Replacement class codes (repeat or comma-separate)
        #[arg(long = "class", short = 'c', value_delimiter = ',')]
        classes: Option<Vec<String>>,
    },

    /// Join an existing lab
    Join {
        /// Lab ID
        lab_id: String,
    },

    /// Delete a lab
    #[command(alias = "rm")]
    Delete {
        /// Lab ID
        lab_id: String,
    },

    /// Machines and students in a lab
    Roster {
        /// Lab ID
        lab_id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MACHINES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MachinesArgs {
    #[command(subcommand)]
    pub command: MachinesCommand,
}

#[derive(Debug, Subcommand)]
pub enum MachinesCommand {
    /// List the machines in a lab
    #[command(alias = "ls")]
    List {
        /// Lab ID
        lab_id: String,
    },

    /// Machine details, session history, and pending tasks
    Show {
        /// Machine key
        machine_key: String,

        /// Session history page (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Record the date of the last physical check
    Check {
        /// Machine key
        machine_key: String,

        /// Check date as dd/mm/yyyy
        #[arg(value_name = "DD/MM/YYYY")]
        date: String,
    },

    /// Set the cleanliness state
    Clean {
        /// Machine key
        machine_key: String,

        /// One of BOM, REGULAR, URGENTE
        state: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TASKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which task list a command reads or refreshes.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TaskScopeArgs {
    /// Tasks of a lab
    #[arg(long)]
    pub lab: Option<String>,

    /// Tasks assigned to a machine
    #[arg(long)]
    pub machine: Option<String>,
}

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List tasks, pending first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        scope: TaskScopeArgs,

        /// Only pending tasks
        #[arg(long)]
        pending: bool,
    },

    /// Create a task for one or more machines of a lab
    Create {
        /// Lab ID
        lab_id: String,

        /// Task name
        #[arg(long, short = 'n')]
        name: String,

        /// Free-form description
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Machine keys (repeat or comma-separate)
        #[arg(long = "machine", short = 'm', value_delimiter = ',', required = true)]
        machines: Vec<String>,
    },

    /// Mark a task complete
    #[command(alias = "done")]
    Complete {
        /// Task ID
        task_id: i64,

        #[command(flatten)]
        scope: TaskScopeArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSIONS / STUDENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub command: SessionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List usage sessions for a lab, machine, or student
    #[command(alias = "ls")]
    #[command(group(ArgGroup::new("target").required(true).args(["lab", "machine", "student"])))]
    List {
        /// Sessions in a lab
        #[arg(long)]
        lab: Option<String>,

        /// Sessions on a machine
        #[arg(long)]
        machine: Option<String>,

        /// Sessions of a student
        #[arg(long)]
        student: Option<i64>,

        /// Only the N most recent sessions
        #[arg(long, conflicts_with = "page")]
        recent: Option<usize>,

        /// Page (1-based)
        #[arg(long)]
        page: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct StudentsArgs {
    #[command(subcommand)]
    pub command: StudentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List the students of a lab
    #[command(alias = "ls")]
    List {
        /// Lab ID
        lab_id: String,
    },

    /// A student's session history
    Sessions {
        /// Student ID
        student_id: i64,

        /// Page (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
    },
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

    /// Print the config file location
    Path,

    /// Store the access key in the system keyring
    SetAccessKey {
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
