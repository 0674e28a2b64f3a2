use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "planbook")]
#[command(version, about = "A local-first planner: notes, goals, plans and budget")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new planbook in the current directory
    Init,

    /// Add a new entry
    Add(AddCommand),

    /// List entries
    List {
        /// Collection to list (note, goal, plan, drawing, subscription, transaction).
        /// Lists everything when omitted.
        #[arg(value_name = "TYPE")]
        entity_type: Option<String>,

        /// Only plans on or after this day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only plans on or before this day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single entry
    Get {
        #[arg(value_name = "TYPE")]
        entity_type: String,

        /// Entry id, or an unambiguous prefix of it
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update an entry
    Update(UpdateCommand),

    /// Delete an entry
    Delete {
        #[arg(value_name = "TYPE")]
        entity_type: String,

        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show or change budget settings
    Budget {
        /// Monthly budget amount
        #[arg(long)]
        monthly: Option<f64>,

        #[arg(long)]
        currency: Option<String>,

        /// Enable or disable budget notifications
        #[arg(long)]
        notifications: Option<bool>,

        /// Warning threshold, in percent of the monthly budget
        #[arg(long)]
        threshold: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export data as a JSON bundle
    Export {
        /// What to export (all, tasks, budget)
        #[arg(long, default_value = "all")]
        scope: String,

        /// File or directory to write to. Prints to stdout when omitted.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Import a JSON bundle
    Import {
        /// Bundle file, or "-" for stdin
        file: PathBuf,

        /// merge (keep existing entries) or replace (clear everything first)
        #[arg(long, default_value = "merge")]
        mode: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all planner data
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show today's pomodoro count
    Pomodoro {
        /// Record a completed work session
        #[arg(long)]
        complete: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or set the interface language
    Language {
        /// Language code (en, hu, de, fr, es, it)
        code: Option<String>,
    },

    /// Application settings
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(subcommand)]
    pub entity: AddEntity,
}

#[derive(Subcommand, Debug)]
pub enum AddEntity {
    /// Add a note
    Note {
        title: String,

        /// Note body
        #[arg(long, short = 'c')]
        content: Option<String>,

        /// Read the body from stdin
        #[arg(long)]
        stdin: bool,

        /// Tags (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Linked plan ids (can be specified multiple times)
        #[arg(long = "plan")]
        plans: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Add a goal
    Goal {
        title: String,

        /// Target day (YYYY-MM-DD)
        #[arg(long)]
        target: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        #[arg(long, default_value_t = 0)]
        progress: i32,

        /// Status (not-started, in-progress, completed, paused)
        #[arg(long, default_value = "not-started")]
        status: String,

        #[arg(long)]
        json: bool,
    },

    /// Add a plan
    Plan {
        title: String,

        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Start time (HH:MM on the plan's day, or a full timestamp)
        #[arg(long)]
        start: Option<String>,

        /// End time (HH:MM on the plan's day, or a full timestamp)
        #[arg(long)]
        end: Option<String>,

        /// Priority (low, medium, high)
        #[arg(long, short = 'p', default_value = "medium")]
        priority: String,

        /// Linked note ids (can be specified multiple times)
        #[arg(long = "note")]
        notes: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Add a drawing from an image data URI
    Drawing {
        title: String,

        /// Data URI
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,

        /// Read the data URI from a file
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Add a subscription
    Subscription {
        name: String,

        #[arg(long)]
        cost: f64,

        /// Next payment day (YYYY-MM-DD)
        #[arg(long)]
        next_payment: String,

        #[arg(long, default_value = "USD")]
        currency: String,

        /// Billing cycle (monthly, yearly, weekly, daily, one-time)
        #[arg(long, default_value = "monthly")]
        cycle: String,

        #[arg(long, default_value = "Other")]
        category: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Add as paused
        #[arg(long)]
        inactive: bool,

        #[arg(long)]
        json: bool,
    },

    /// Add a transaction
    Transaction {
        description: String,

        #[arg(long)]
        amount: f64,

        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Type (income, expense, subscription)
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        #[arg(long, default_value = "Other")]
        category: String,

        /// Id of the subscription this payment belongs to
        #[arg(long)]
        subscription: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct UpdateCommand {
    #[command(subcommand)]
    pub entity: UpdateEntity,
}

#[derive(Subcommand, Debug)]
pub enum UpdateEntity {
    /// Update a goal
    Goal {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Target day (YYYY-MM-DD)
        #[arg(long)]
        target: Option<String>,

        /// Set progress as-is (not clamped)
        #[arg(long, conflicts_with_all = ["step", "complete"])]
        progress: Option<i32>,

        /// Move progress by this many points, clamped to 0..=100, adjusting status
        #[arg(long, allow_hyphen_values = true, conflicts_with = "complete")]
        step: Option<i32>,

        /// Mark completed at 100%
        #[arg(long)]
        complete: bool,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Update a plan
    Plan {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        /// Remove start and end times
        #[arg(long, conflicts_with_all = ["start", "end"])]
        clear_times: bool,

        #[arg(long, short = 'p')]
        priority: Option<String>,

        /// Mark as done
        #[arg(long, conflicts_with = "undone")]
        done: bool,

        /// Mark as not done
        #[arg(long)]
        undone: bool,

        /// Replace the linked note ids (can be specified multiple times)
        #[arg(long = "note")]
        notes: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Update a note
    Note {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short = 'c', conflicts_with = "stdin")]
        content: Option<String>,

        /// Read the new body from stdin
        #[arg(long)]
        stdin: bool,

        /// Replace the tags (can be specified multiple times)
        #[arg(long = "tag", short = 't', conflicts_with = "clear_tags")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,

        /// Replace the linked plan ids (can be specified multiple times)
        #[arg(long = "plan")]
        plans: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Update a drawing
    Drawing {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New data URI
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,

        /// Read the new data URI from a file
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Update a subscription
    Subscription {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        #[arg(long)]
        cost: Option<f64>,

        #[arg(long)]
        currency: Option<String>,

        /// Billing cycle (monthly, yearly, weekly, daily, one-time)
        #[arg(long)]
        cycle: Option<String>,

        /// Next payment day (YYYY-MM-DD)
        #[arg(long)]
        next_payment: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Resume payments
        #[arg(long, conflicts_with = "pause")]
        resume: bool,

        /// Pause payments
        #[arg(long)]
        pause: bool,

        #[arg(long)]
        json: bool,
    },

    /// Update a transaction
    Transaction {
        id: String,

        #[arg(long, short = 'd')]
        description: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        amount: Option<f64>,

        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Type (income, expense, subscription)
        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Id of the subscription this payment belongs to
        #[arg(long, conflicts_with = "detach")]
        subscription: Option<String>,

        /// Drop the subscription reference
        #[arg(long)]
        detach: bool,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the current settings
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Export settings as JSON
    Export {
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Change one setting, e.g. `general.sidebarPosition right`
    Set {
        /// Section and field, as in the JSON export
        key: String,

        value: String,
    },

    /// Import settings from an export file
    Import { file: PathBuf },

    /// Restore the default settings
    Reset,
}
