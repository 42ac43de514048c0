use crate::model::{Accent, Note, NoteDraft, NotePatch, Period};
use chrono::Local;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("title is required")]
    EmptyTitle,
    #[error("at least one item is required")]
    NoItems,
}

/// Raw form input as typed by the user, before trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub time_label: String,
    pub items: Vec<String>,
    pub period: Period,
    pub accent: Accent,
}

impl Default for NoteForm {
    fn default() -> Self {
        NoteForm {
            title: String::new(),
            time_label: String::new(),
            items: vec![String::new()],
            period: Period::Today,
            accent: Accent::Lavender,
        }
    }
}

impl NoteForm {
    pub fn from_note(note: &Note) -> Self {
        NoteForm {
            title: note.title.clone(),
            time_label: note.time_label.clone(),
            items: if note.items.is_empty() {
                vec![String::new()]
            } else {
                note.items.clone()
            },
            period: note.period,
            accent: note.accent,
        }
    }

    /// Trims everything, drops blank items, and falls back to `now_label`
    /// when no time label was given.
    pub fn validate(&self, now_label: &str) -> Result<NoteDraft, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        let items: Vec<String> = self
            .items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        if items.is_empty() {
            return Err(DraftError::NoItems);
        }
        let time_label = match self.time_label.trim() {
            "" => now_label.trim().to_string(),
            label => label.to_string(),
        };
        Ok(NoteDraft {
            title: title.to_string(),
            time_label,
            items,
            period: self.period,
            accent: self.accent,
        })
    }
}

impl NoteDraft {
    /// Every field replaced, as the edit modal does.
    pub fn into_patch(self) -> NotePatch {
        NotePatch {
            title: Some(self.title),
            time_label: Some(self.time_label),
            items: Some(self.items),
            period: Some(self.period),
            accent: Some(self.accent),
        }
    }
}

/// Local wall-clock time in the `8:05 PM` style.
pub fn current_time_label() -> String {
    Local::now().format("%-I:%M %p").to_string()
}

/// Trimmed, non-empty entries only.
pub fn clean_items<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .filter_map(|item| {
            let trimmed = item.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}
