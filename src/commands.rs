use crate::config::Config;
use crate::draft::{clean_items, current_time_label, DraftError, NoteForm};
use crate::model::{Accent, Folder, FolderFilter, Note, NotePatch, Period};
use crate::seed::suggestions;
use crate::storage::{init_project_store, FileStore, KeyValueStore, StoreLocation};
use crate::store::{NotesStore, StateOrigin};
use crate::ui;
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::env;

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub location: StoreLocation,
}

impl Session {
    pub fn open_store(&self) -> NotesStore<FileStore> {
        NotesStore::initialize(self.location.file_store(), self.config.storage_key.clone())
    }
}

pub fn init(config: &Config) -> Result<()> {
    let cwd = env::current_dir()?;
    let location = init_project_store(&cwd)?;
    let store = NotesStore::initialize(location.file_store(), config.storage_key.clone());
    report_persist(&store);
    match store.origin() {
        StateOrigin::Seeded => println!("Initialized notes at {}", location.dir.display()),
        StateOrigin::Restored => println!(
            "Notes already present at {} ({} notes)",
            location.dir.display(),
            store.notes().len()
        ),
    }
    Ok(())
}

pub fn list(session: &Session, period: Option<Period>) -> Result<()> {
    let store = session.open_store();
    println!(
        "Notes ({}, {})",
        session.location.scope.label(),
        session.location.dir.display()
    );
    for (bucket, count) in store.period_counts() {
        if let Some(filter) = period {
            if filter != bucket {
                continue;
            }
        }
        println!("{} ({})", bucket.label(), count);
        let notes = store.notes_by_period(bucket);
        if notes.is_empty() {
            println!("  (empty)");
        }
        for note in notes {
            print_note(note);
        }
        println!();
    }
    Ok(())
}

pub fn recent(session: &Session, limit: Option<usize>) -> Result<()> {
    let store = session.open_store();
    let limit = limit.unwrap_or(session.config.recent_limit);
    let notes = store.recent_notes(limit);
    if notes.is_empty() {
        println!("No notes yet");
    }
    for note in notes {
        println!(
            "  - {}: {}  ({})",
            note.id,
            note.title,
            format_age(note.updated_at, Utc::now())
        );
    }
    Ok(())
}

pub fn folders(session: &Session, filter: FolderFilter) -> Result<()> {
    let store = session.open_store();
    let counts = store
        .folder_filter_counts()
        .into_iter()
        .map(|(f, n)| format!("{} ({})", f.label(), n))
        .collect::<Vec<_>>();
    println!("{}", counts.join("  "));
    for folder in store.folders_by_filter(filter) {
        print_folder(folder);
    }
    Ok(())
}

pub fn add(
    session: &Session,
    title: String,
    items: Vec<String>,
    time_label: Option<String>,
    period: Period,
    accent: Accent,
) -> Result<()> {
    let form = NoteForm {
        title,
        time_label: time_label.unwrap_or_default(),
        items,
        period,
        accent,
    };
    let draft = form.validate(&current_time_label())?;
    let mut store = session.open_store();
    let id = store.create_note(draft);
    report_persist(&store);
    println!("Added note {} to {}", id, period.label());
    Ok(())
}

pub fn edit(
    session: &Session,
    note_id: String,
    title: Option<String>,
    time_label: Option<String>,
    items: Vec<String>,
    period: Option<Period>,
    accent: Option<Accent>,
) -> Result<()> {
    let title = match title.map(|t| t.trim().to_string()) {
        Some(t) if t.is_empty() => return Err(DraftError::EmptyTitle.into()),
        other => other,
    };
    let items = if items.is_empty() {
        None
    } else {
        let cleaned = clean_items(&items);
        if cleaned.is_empty() {
            return Err(DraftError::NoItems.into());
        }
        Some(cleaned)
    };
    let time_label = time_label.map(|label| match label.trim() {
        "" => current_time_label(),
        trimmed => trimmed.to_string(),
    });
    let patch = NotePatch {
        title,
        time_label,
        items,
        period,
        accent,
    };
    if patch.is_empty() {
        bail!("nothing to change for note {}", note_id);
    }
    let mut store = session.open_store();
    if !store.update_note(&note_id, patch) {
        bail!("note {} not found", note_id);
    }
    report_persist(&store);
    println!("Updated note {}", note_id);
    Ok(())
}

pub fn delete(session: &Session, note_id: String) -> Result<()> {
    let mut store = session.open_store();
    if !store.delete_note(&note_id) {
        bail!("note {} not found", note_id);
    }
    report_persist(&store);
    println!("Deleted note {}", note_id);
    Ok(())
}

pub fn search(session: &Session, query: String) -> Result<()> {
    let store = session.open_store();
    let results = store.search_notes(&query);
    if results.is_empty() {
        println!("No notes match {:?}", query.trim());
    }
    for note in results {
        print_note(note);
    }
    Ok(())
}

pub fn suggest(session: &Session) -> Result<()> {
    let draft = suggestions()
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| anyhow!("no suggestions available"))?;
    let period = draft.period;
    let mut store = session.open_store();
    let id = store.create_note(draft);
    report_persist(&store);
    println!("Added note {} to {}", id, period.label());
    Ok(())
}

pub fn tui(session: &Session) -> Result<()> {
    let store = session.open_store();
    ui::run(store, session.location.clone(), session.config.recent_limit)
}

fn report_persist<S: KeyValueStore>(store: &NotesStore<S>) {
    if let Some(err) = store.last_persist_error() {
        eprintln!("warning: changes kept in memory only ({})", err);
    }
}

pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

fn print_note(note: &Note) {
    println!("  - {}: {}  [{}, {}]", note.id, note.title, note.time_label, note.accent);
    for item in &note.items {
        println!("      • {}", item);
    }
}

fn print_folder(folder: &Folder) {
    let marker = if folder.is_recent { " *" } else { "" };
    println!(
        "  [{}] {}{}  ({})",
        folder.abbreviation,
        folder.name,
        marker,
        format_age(folder.updated_at, Utc::now())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn ages_are_coarse() {
        let now = Utc::now();
        assert_eq!(format_age(now, now), "just now");
        assert_eq!(format_age(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_age(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_age(now - Duration::days(6), now), "6d ago");
        assert_eq!(format_age(now + Duration::hours(1), now), "just now");
    }
}
