//! Notes and folders organizer.
//!
//! The heart of the crate is [`NotesStore`]: it loads a JSON snapshot from a
//! [`KeyValueStore`] (or seeds example data), exposes derived views, and writes
//! the whole state back after every create, update or delete. The terminal UI
//! and the CLI commands are thin consumers of that store.

pub mod cli;
pub mod commands;
pub mod config;
pub mod draft;
pub mod ids;
pub mod model;
pub mod seed;
pub mod storage;
pub mod store;
pub mod ui;
pub mod views;

pub use config::Config;
pub use draft::{DraftError, NoteForm};
pub use model::{
    Accent, Folder, FolderFilter, Note, NoteDraft, NoteId, NotePatch, NotesState, ParseEnumError,
    Period,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StoreLocation, StoreScope};
pub use store::{Clock, NotesStore, StateOrigin, SystemClock, DEFAULT_STORAGE_KEY};
