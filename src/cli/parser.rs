use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rTimeBilling
/// Track time per project and bill it at hourly rates, stored in SQLite
#[derive(Parser)]
#[command(
    name = "rtimebilling",
    version = env!("CARGO_PKG_VERSION"),
    about = "Personal time tracking with per-project hourly rates, timers and XLSX export",
    long_about = None
)]
pub struct Cli {
    /// Override the data file (useful for tests or a fixed file)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the current data file
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage projects and their hourly rates
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Log, list, change or remove time entries
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },

    /// Server-side stopwatches
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },

    /// Show the date x project hour matrix
    Ledger,

    /// Show hours, cost and shares per project
    Analytics {
        #[arg(long = "rebuild", help = "Recompute the derived tables first")]
        rebuild: bool,
    },

    /// Export to an XLSX workbook
    Export {
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        project: Option<String>,

        #[arg(long, help = "Export every project into one workbook")]
        all: bool,

        #[arg(
            long,
            value_name = "FILE",
            help = "Output file (default: next to the data file)"
        )]
        file: Option<String>,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Serve the HTTP API
    Serve {
        #[arg(long, value_name = "ADDR", help = "Listen address (default from config)")]
        bind: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// List projects with their rates
    List,

    /// Create a project
    Add {
        name: String,

        #[arg(long, default_value_t = 0.0, help = "Hourly rate")]
        rate: f64,
    },

    /// Set the hourly rate of an existing project
    Rate { name: String, rate: f64 },
}

#[derive(Args)]
pub struct EntryFields {
    /// Date (YYYY-MM-DD, DD.MM.YYYY or DD/MM/YYYY)
    #[arg(long)]
    pub date: Option<String>,

    /// Start time (HH:MM)
    #[arg(long = "start")]
    pub start: Option<String>,

    /// End time (HH:MM)
    #[arg(long = "end")]
    pub end: Option<String>,

    /// Duration in hours
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Subcommand)]
pub enum EntryAction {
    /// Log a time entry (duration derived from start/end when omitted)
    Add {
        project: String,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// List entries, newest first
    List {
        #[arg(long)]
        project: Option<String>,
    },

    /// Change an entry addressed by id or by `project|date|start|end`
    Update {
        id: String,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Remove an entry addressed by id or by `project|date|start|end`
    Del { id: String },
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or restart) a timer
    Start { timer_id: String, project: String },

    /// Set the elapsed seconds of a timer
    Update { timer_id: String, elapsed: f64 },

    /// Stop a timer; it stays listed
    Stop { timer_id: String },

    /// Remove a timer
    Del { timer_id: String },

    /// List timers
    List,
}
