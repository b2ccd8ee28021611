use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "u-squad")]
#[command(about = "Weekly squad rotation with cooldown-based leaders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database file
    #[arg(long, default_value = "squads.db")]
    pub db: PathBuf,

    /// Settings file (defaults apply when missing)
    #[arg(long, default_value = "squad.toml")]
    pub config: PathBuf,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate squads for a week, or show them if already generated
    Generate {
        /// Any date in the week (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Label to store under (defaults to the week label, e.g. "2024-01 week 1")
        #[arg(long)]
        label: Option<String>,
    },

    /// Copy another week's squads into this week without reshuffling
    Clone {
        /// Any date in the target week (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Any date in the source week (defaults to the previous week)
        #[arg(long)]
        from: Option<NaiveDate>,
    },

    /// Print stored squads
    Show {
        /// Date label
        label: String,
    },

    /// List stored weeks, newest first
    History,

    /// Delete a stored week
    Delete {
        /// Date label
        label: String,
    },

    /// Show recent audit log entries
    Log {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Manage the roster
    Member {
        #[command(subcommand)]
        cmd: MemberCommands,
    },
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member
    Add {
        name: String,

        /// Display group (lower shows first)
        #[arg(long)]
        priority: Option<u32>,

        /// May lead only in weeks starting after this date
        #[arg(long, conflicts_with = "never_lead")]
        enable_date: Option<NaiveDate>,

        /// Never selected as leader
        #[arg(long)]
        never_lead: bool,
    },

    /// List members
    List,

    /// Change a member's fields
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        priority: Option<u32>,

        #[arg(long, conflicts_with = "never_lead")]
        enable_date: Option<NaiveDate>,

        #[arg(long)]
        never_lead: bool,

        /// Monday of the last week led
        #[arg(long)]
        last_led: Option<NaiveDate>,
    },

    /// Remove a member
    Remove { id: i64 },
}
