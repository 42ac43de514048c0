use crate::model::{Accent, FolderFilter, Period};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notefold", version, about = "Terminal notes and folders organizer")]
pub struct Cli {
    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the notes snapshot
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a project-local store in the current directory
    Init,
    /// List notes, grouped by period
    List {
        /// Only show one period (today, thisWeek, thisMonth)
        #[arg(long)]
        period: Option<Period>,
    },
    /// Show the most recently updated notes
    Recent {
        /// How many notes to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List folders
    Folders {
        /// all, recent or lastModified
        #[arg(long, default_value = "all")]
        filter: FolderFilter,
    },
    /// Add a new note
    Add {
        /// Title of the note
        title: String,
        /// Checklist item (repeatable, at least one)
        #[arg(long = "item", short = 'i')]
        items: Vec<String>,
        /// Display time, e.g. "8:00 PM" (defaults to now)
        #[arg(long)]
        time_label: Option<String>,
        #[arg(long, default_value = "today")]
        period: Period,
        #[arg(long, default_value = "lavender")]
        accent: Accent,
    },
    /// Edit an existing note
    Edit {
        /// Note id to edit
        note_id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New time label
        #[arg(long)]
        time_label: Option<String>,
        /// Replace items (repeatable)
        #[arg(long = "item", short = 'i')]
        items: Vec<String>,
        #[arg(long)]
        period: Option<Period>,
        #[arg(long)]
        accent: Option<Accent>,
    },
    /// Delete a note
    Delete {
        /// Note id to delete
        note_id: String,
    },
    /// Search titles, items and time labels
    Search {
        query: String,
    },
    /// Add one of the suggested notes at random
    Suggest,
    /// Launch the interactive TUI
    Tui,
}
