//! Read-only projections over a notes snapshot.
//!
//! Every function here is pure: same state in, same output out. Nothing is
//! cached, callers recompute after each mutation.

use crate::model::{Folder, FolderFilter, Note, Period};

pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Notes in `period`, in storage order.
pub fn notes_by_period(notes: &[Note], period: Period) -> Vec<&Note> {
    notes.iter().filter(|n| n.period == period).collect()
}

/// Most recently updated first; ties keep storage order.
pub fn recent_notes(notes: &[Note], limit: usize) -> Vec<&Note> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.truncate(limit);
    sorted
}

pub fn folders_by_filter(folders: &[Folder], filter: FolderFilter) -> Vec<&Folder> {
    match filter {
        FolderFilter::All => folders.iter().collect(),
        FolderFilter::Recent => folders.iter().filter(|f| f.is_recent).collect(),
        FolderFilter::LastModified => {
            let mut sorted: Vec<&Folder> = folders.iter().collect();
            sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            sorted
        }
    }
}

/// Case-insensitive substring match over title, items and time label.
/// A blank query matches nothing.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    notes
        .iter()
        .filter(|note| {
            note.title.to_lowercase().contains(&needle)
                || note
                    .items
                    .iter()
                    .any(|item| item.to_lowercase().contains(&needle))
                || note.time_label.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn period_counts(notes: &[Note]) -> Vec<(Period, usize)> {
    Period::BOARD_ORDER
        .iter()
        .map(|p| (*p, notes.iter().filter(|n| n.period == *p).count()))
        .collect()
}

pub fn folder_filter_counts(folders: &[Folder]) -> Vec<(FolderFilter, usize)> {
    FolderFilter::ALL
        .iter()
        .map(|f| (*f, folders_by_filter(folders, *f).len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Accent;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    fn note(id: &str, period: Period, minutes: i64) -> Note {
        Note {
            id: id.into(),
            title: id.to_uppercase(),
            time_label: "9:00 AM".into(),
            period,
            items: vec![format!("item for {}", id)],
            accent: Accent::Mint,
            updated_at: base() + Duration::minutes(minutes),
        }
    }

    fn folder(id: &str, minutes: i64, is_recent: bool) -> Folder {
        Folder {
            id: id.into(),
            name: id.into(),
            abbreviation: id[..2].into(),
            accent: Accent::Sunrise,
            updated_at: base() + Duration::minutes(minutes),
            is_recent,
        }
    }

    fn note_ids<'a>(notes: &[&'a Note]) -> Vec<&'a str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    fn folder_ids<'a>(folders: &[&'a Folder]) -> Vec<&'a str> {
        folders.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn period_filter_keeps_storage_order() {
        let notes = vec![
            note("a", Period::Today, 1),
            note("b", Period::ThisWeek, 5),
            note("c", Period::Today, 9),
        ];
        let today = notes_by_period(&notes, Period::Today);
        assert_eq!(note_ids(&today), vec!["a", "c"]);
        assert!(notes_by_period(&notes, Period::ThisMonth).is_empty());
    }

    #[test]
    fn recent_is_stable_on_equal_timestamps() {
        let notes = vec![
            note("old", Period::Today, 0),
            note("tie-1", Period::Today, 10),
            note("tie-2", Period::ThisWeek, 10),
            note("new", Period::ThisMonth, 20),
        ];
        let recent = recent_notes(&notes, 3);
        assert_eq!(
            note_ids(&recent),
            vec!["new", "tie-1", "tie-2"]
        );
        assert_eq!(recent_notes(&notes, 10).len(), 4);
        assert!(recent_notes(&notes, 0).is_empty());
    }

    #[test]
    fn folder_filters() {
        let folders = vec![
            folder("alpha", 5, true),
            folder("beta", 30, false),
            folder("gamma", 5, true),
            folder("delta", 60, false),
        ];
        let all = folders_by_filter(&folders, FolderFilter::All);
        assert_eq!(
            folder_ids(&all),
            vec!["alpha", "beta", "gamma", "delta"]
        );
        let recent = folders_by_filter(&folders, FolderFilter::Recent);
        assert_eq!(folder_ids(&recent), vec!["alpha", "gamma"]);
        let modified = folders_by_filter(&folders, FolderFilter::LastModified);
        assert_eq!(
            folder_ids(&modified),
            vec!["delta", "beta", "alpha", "gamma"]
        );
    }

    #[test]
    fn search_matches_title_items_and_time_label() {
        let mut notes = vec![
            note("groceries", Period::Today, 0),
            note("books", Period::ThisWeek, 1),
            note("ideas", Period::ThisMonth, 2),
        ];
        notes[1].items = vec!["Atomic Habits".into()];
        notes[2].time_label = "Friday 5:00 PM".into();

        let by_title = search_notes(&notes, "GROC");
        assert_eq!(note_ids(&by_title), vec!["groceries"]);
        let by_item = search_notes(&notes, "atomic");
        assert_eq!(note_ids(&by_item), vec!["books"]);
        let by_label = search_notes(&notes, "  friday ");
        assert_eq!(note_ids(&by_label), vec!["ideas"]);
        assert!(search_notes(&notes, "   ").is_empty());
        assert!(search_notes(&notes, "nothing like this").is_empty());
    }

    #[test]
    fn counts_follow_board_order() {
        let notes = vec![
            note("a", Period::Today, 0),
            note("b", Period::Today, 0),
            note("c", Period::ThisMonth, 0),
        ];
        assert_eq!(
            period_counts(&notes),
            vec![
                (Period::ThisMonth, 1),
                (Period::ThisWeek, 0),
                (Period::Today, 2)
            ]
        );
        let folders = vec![folder("alpha", 0, true), folder("beta", 0, false)];
        assert_eq!(
            folder_filter_counts(&folders),
            vec![
                (FolderFilter::All, 2),
                (FolderFilter::Recent, 1),
                (FolderFilter::LastModified, 2)
            ]
        );
    }
}
