use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use notefold::cli::{Cli, Command};
use notefold::commands::{self, Session};
use notefold::config::Config;
use notefold::storage::{locate_store, StoreLocation};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

fn main() -> Result<()> {
    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;
    let command = args.command.unwrap_or(Command::Tui);

    let cwd = env::current_dir()?;
    let override_dir = args.data_dir.clone().or_else(|| config.data_dir.clone());
    let location = locate_store(&cwd, override_dir.as_deref())?;

    let tui = matches!(command, Command::Tui);
    initialize_logger(&config, args.verbose, tui.then_some(&location));
    info!(
        "using {} store at {}",
        location.scope.label(),
        location.dir.display()
    );

    let session = Session { config, location };
    match command {
        Command::Init => commands::init(&session.config),
        Command::List { period } => commands::list(&session, period),
        Command::Recent { limit } => commands::recent(&session, limit),
        Command::Folders { filter } => commands::folders(&session, filter),
        Command::Add {
            title,
            items,
            time_label,
            period,
            accent,
        } => commands::add(&session, title, items, time_label, period, accent),
        Command::Edit {
            note_id,
            title,
            time_label,
            items,
            period,
            accent,
        } => commands::edit(&session, note_id, title, time_label, items, period, accent),
        Command::Delete { note_id } => commands::delete(&session, note_id),
        Command::Search { query } => commands::search(&session, query),
        Command::Suggest => commands::suggest(&session),
        Command::Tui => commands::tui(&session),
    }
}

/// Logs go to stderr, or to `notefold.log` beside the snapshot while the TUI
/// owns the terminal.
fn initialize_logger(config: &Config, verbose: bool, log_to: Option<&StoreLocation>) {
    let default_filter = if verbose {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("warn")
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    builder.format_timestamp_secs();

    if let Some(location) = log_to {
        builder.target(log_target(&location.dir));
    }

    builder.init();
}

/// An unwritable data directory discards log output rather than blocking the
/// TUI; the store reports the same failure on its first write.
fn log_target(dir: &Path) -> env_logger::Target {
    match open_log_file(dir) {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(err) => {
            eprintln!("warning: logging disabled ({:#})", err);
            env_logger::Target::Pipe(Box::new(io::sink()))
        }
    }
}

fn open_log_file(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    let path = dir.join("notefold.log");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {:?}", path))
}
