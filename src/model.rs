use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type NoteId = String;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NotesState {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub time_label: String,
    pub period: Period,
    pub items: Vec<String>,
    pub accent: Accent,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub accent: Accent,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_recent: bool,
}

/// Coarse bucket chosen by the user. Never derived from `updated_at`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    Today,
    ThisWeek,
    ThisMonth,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Accent {
    Lavender,
    Peach,
    Mint,
    Sunrise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderFilter {
    All,
    Recent,
    LastModified,
}

/// Fields required to create a note. Callers validate before handing it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub time_label: String,
    pub items: Vec<String>,
    pub period: Period,
    pub accent: Accent,
}

/// Partial update merged onto an existing note. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub time_label: Option<String>,
    pub items: Option<Vec<String>>,
    pub period: Option<Period>,
    pub accent: Option<Accent>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value} (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl NotesState {
    pub fn contains_note(&self, id: &str) -> bool {
        self.notes.iter().any(|n| n.id == id)
    }

    pub fn find_note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// A snapshot is only usable when both collections carry data.
    pub fn is_usable(&self) -> bool {
        !self.notes.is_empty() && !self.folders.is_empty()
    }
}

impl Note {
    pub fn from_draft(id: NoteId, draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Note {
            id,
            title: draft.title,
            time_label: draft.time_label,
            period: draft.period,
            items: draft.items,
            accent: draft.accent,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(time_label) = patch.time_label {
            self.time_label = time_label;
        }
        if let Some(items) = patch.items {
            self.items = items;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
        if let Some(accent) = patch.accent {
            self.accent = accent;
        }
    }
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.time_label.is_none()
            && self.items.is_none()
            && self.period.is_none()
            && self.accent.is_none()
    }
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Today, Period::ThisWeek, Period::ThisMonth];

    /// Tab order on the notes board.
    pub const BOARD_ORDER: [Period; 3] = [Period::ThisMonth, Period::ThisWeek, Period::Today];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::ThisWeek => "This Week",
            Period::ThisMonth => "This Month",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::ThisWeek => "thisWeek",
            Period::ThisMonth => "thisMonth",
        }
    }
}

impl Accent {
    pub const ALL: [Accent; 4] = [Accent::Lavender, Accent::Peach, Accent::Mint, Accent::Sunrise];

    pub fn label(&self) -> &'static str {
        match self {
            Accent::Lavender => "Lavender",
            Accent::Peach => "Peach",
            Accent::Mint => "Mint",
            Accent::Sunrise => "Sunrise",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Accent::Lavender => "lavender",
            Accent::Peach => "peach",
            Accent::Mint => "mint",
            Accent::Sunrise => "sunrise",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Accent::Lavender => (0xd8, 0xcc, 0xff),
            Accent::Peach => (0xff, 0xd7, 0xc5),
            Accent::Mint => (0xe6, 0xfa, 0xc9),
            Accent::Sunrise => (0xff, 0xe5, 0xb0),
        }
    }

    pub fn next(&self) -> Accent {
        cycle(&Accent::ALL, *self, 1)
    }

    pub fn prev(&self) -> Accent {
        cycle(&Accent::ALL, *self, Accent::ALL.len() - 1)
    }
}

impl FolderFilter {
    pub const ALL: [FolderFilter; 3] = [
        FolderFilter::All,
        FolderFilter::Recent,
        FolderFilter::LastModified,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FolderFilter::All => "All",
            FolderFilter::Recent => "Recent",
            FolderFilter::LastModified => "Last modified",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            FolderFilter::All => "all",
            FolderFilter::Recent => "recent",
            FolderFilter::LastModified => "lastModified",
        }
    }
}

impl Period {
    pub fn next(&self) -> Period {
        cycle(&Period::ALL, *self, 1)
    }

    pub fn prev(&self) -> Period {
        cycle(&Period::ALL, *self, Period::ALL.len() - 1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Period {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "today" => Ok(Period::Today),
            "thisweek" | "week" => Ok(Period::ThisWeek),
            "thismonth" | "month" => Ok(Period::ThisMonth),
            _ => Err(ParseEnumError {
                kind: "period",
                value: s.to_string(),
                expected: "today, thisWeek, thisMonth",
            }),
        }
    }
}

impl FromStr for Accent {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "lavender" => Ok(Accent::Lavender),
            "peach" => Ok(Accent::Peach),
            "mint" => Ok(Accent::Mint),
            "sunrise" => Ok(Accent::Sunrise),
            _ => Err(ParseEnumError {
                kind: "accent",
                value: s.to_string(),
                expected: "lavender, peach, mint, sunrise",
            }),
        }
    }
}

impl FromStr for FolderFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "all" => Ok(FolderFilter::All),
            "recent" => Ok(FolderFilter::Recent),
            "lastmodified" => Ok(FolderFilter::LastModified),
            _ => Err(ParseEnumError {
                kind: "folder filter",
                value: s.to_string(),
                expected: "all, recent, lastModified",
            }),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for FolderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note() -> Note {
        Note {
            id: "ideas-1".into(),
            title: "Ideas".into(),
            time_label: "4:30 PM".into(),
            period: Period::ThisMonth,
            items: vec!["Plan a team off-site".into()],
            accent: Accent::Peach,
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn note_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample_note()).unwrap();
        assert_eq!(json["timeLabel"], "4:30 PM");
        assert_eq!(json["period"], "thisMonth");
        assert_eq!(json["accent"], "peach");
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("time_label").is_none());
    }

    #[test]
    fn folder_is_recent_defaults_to_false_and_is_omitted() {
        let raw = r#"{"id":"work","name":"Work","abbreviation":"Wo","accent":"sunrise","updatedAt":"2024-05-01T12:00:00.000Z"}"#;
        let folder: Folder = serde_json::from_str(raw).unwrap();
        assert!(!folder.is_recent);
        let back = serde_json::to_value(&folder).unwrap();
        assert!(back.get("isRecent").is_none());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut note = sample_note();
        note.apply(NotePatch {
            title: Some("Big Ideas".into()),
            ..NotePatch::default()
        });
        assert_eq!(note.title, "Big Ideas");
        assert_eq!(note.time_label, "4:30 PM");
        assert_eq!(note.items, vec!["Plan a team off-site".to_string()]);
        assert_eq!(note.period, Period::ThisMonth);
    }

    #[test]
    fn enums_parse_loosely() {
        assert_eq!("thisWeek".parse::<Period>().unwrap(), Period::ThisWeek);
        assert_eq!("this-month".parse::<Period>().unwrap(), Period::ThisMonth);
        assert_eq!("Mint".parse::<Accent>().unwrap(), Accent::Mint);
        assert_eq!(
            "last_modified".parse::<FolderFilter>().unwrap(),
            FolderFilter::LastModified
        );
        assert!("yesterday".parse::<Period>().is_err());
    }

    #[test]
    fn accent_cycles_both_ways() {
        assert_eq!(Accent::Sunrise.next(), Accent::Lavender);
        assert_eq!(Accent::Lavender.prev(), Accent::Sunrise);
        assert_eq!(Period::ThisMonth.next(), Period::Today);
    }
}
