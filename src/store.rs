use crate::ids::note_id_for;
use crate::model::{Folder, FolderFilter, Note, NoteDraft, NoteId, NotePatch, NotesState, Period};
use crate::seed::default_state;
use crate::storage::KeyValueStore;
use crate::views;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

pub const DEFAULT_STORAGE_KEY: &str = "notes-app-state";

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOrigin {
    Restored,
    Seeded,
}

/// Owns the live notes state and writes it through to `backend` after every
/// change.
///
/// Writes are best effort: a failing backend is logged and remembered in
/// [`NotesStore::last_persist_error`], the in-memory state stays authoritative.
/// Mutations that target an unknown id are silent no-ops and report `false`.
pub struct NotesStore<S: KeyValueStore> {
    backend: S,
    key: String,
    state: NotesState,
    origin: StateOrigin,
    clock: Box<dyn Clock>,
    last_persist_error: Option<String>,
}

impl<S: KeyValueStore> NotesStore<S> {
    pub fn initialize(backend: S, key: impl Into<String>) -> Self {
        Self::initialize_with_clock(backend, key, Box::new(SystemClock))
    }

    pub fn initialize_with_clock(backend: S, key: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        let key = key.into();
        let restored = load_snapshot(&backend, &key);
        let mut store = NotesStore {
            backend,
            key,
            state: NotesState {
                notes: Vec::new(),
                folders: Vec::new(),
            },
            origin: StateOrigin::Restored,
            clock,
            last_persist_error: None,
        };
        match restored {
            Some(state) => {
                info!(
                    "restored {} notes and {} folders",
                    state.notes.len(),
                    state.folders.len()
                );
                store.state = state;
            }
            None => {
                info!("no usable snapshot under {:?}, seeding defaults", store.key);
                store.state = default_state(store.clock.now());
                store.origin = StateOrigin::Seeded;
                store.persist();
            }
        }
        store
    }

    pub fn state(&self) -> &NotesState {
        &self.state
    }

    pub fn origin(&self) -> StateOrigin {
        self.origin
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn notes(&self) -> &[Note] {
        &self.state.notes
    }

    pub fn folders(&self) -> &[Folder] {
        &self.state.folders
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.state.find_note(id)
    }

    pub fn notes_by_period(&self, period: Period) -> Vec<&Note> {
        views::notes_by_period(&self.state.notes, period)
    }

    pub fn folders_by_filter(&self, filter: FolderFilter) -> Vec<&Folder> {
        views::folders_by_filter(&self.state.folders, filter)
    }

    pub fn recent_notes(&self, limit: usize) -> Vec<&Note> {
        views::recent_notes(&self.state.notes, limit)
    }

    pub fn search_notes(&self, query: &str) -> Vec<&Note> {
        views::search_notes(&self.state.notes, query)
    }

    pub fn period_counts(&self) -> Vec<(Period, usize)> {
        views::period_counts(&self.state.notes)
    }

    pub fn folder_filter_counts(&self) -> Vec<(FolderFilter, usize)> {
        views::folder_filter_counts(&self.state.folders)
    }

    pub fn create_note(&mut self, draft: NoteDraft) -> NoteId {
        let id = note_id_for(&draft.title, |candidate| self.state.contains_note(candidate));
        let note = Note::from_draft(id.clone(), draft, self.clock.now());
        debug!("creating note {}", id);
        self.state.notes.insert(0, note);
        self.persist();
        id
    }

    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> bool {
        let now = self.clock.now();
        let note = match self.state.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => note,
            None => {
                debug!("update ignored, no note {}", id);
                return false;
            }
        };
        note.apply(patch);
        note.updated_at = later_than(note.updated_at, now);
        debug!("updated note {}", id);
        self.persist();
        true
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.state.notes.len();
        self.state.notes.retain(|n| n.id != id);
        if self.state.notes.len() == before {
            debug!("delete ignored, no note {}", id);
            return false;
        }
        debug!("deleted note {}", id);
        self.persist();
        true
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.state) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("could not serialize notes state: {}", err);
                self.last_persist_error = Some(err.to_string());
                return;
            }
        };
        match self.backend.set(&self.key, &payload) {
            Ok(()) => {
                debug!("persisted {} bytes under {:?}", payload.len(), self.key);
                self.last_persist_error = None;
            }
            Err(err) => {
                warn!("could not persist notes state: {}", err);
                self.last_persist_error = Some(err.to_string());
            }
        }
    }
}

/// Reads and validates the snapshot. Every failure reads as "absent".
pub fn load_snapshot<S: KeyValueStore>(backend: &S, key: &str) -> Option<NotesState> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!("could not read snapshot {:?}: {}", key, err);
            return None;
        }
    };
    let state: NotesState = match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(err) => {
            warn!("discarding unreadable snapshot {:?}: {}", key, err);
            return None;
        }
    };
    if !state.is_usable() {
        warn!("discarding snapshot {:?} with an empty collection", key);
        return None;
    }
    Some(state)
}

fn later_than(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
