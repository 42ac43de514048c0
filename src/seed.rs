use crate::ids::note_id_for;
use crate::model::{Accent, Folder, Note, NoteDraft, NotesState, Period};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// The example state materialized when no usable snapshot exists.
///
/// Everything except note ids and timestamps (which are relative to `now`)
/// is fixed.
pub fn default_state(now: DateTime<Utc>) -> NotesState {
    let mut taken: HashSet<String> = HashSet::new();
    let mut note = |id_prefix: &str,
                    title: &str,
                    time_label: &str,
                    period: Period,
                    items: &[&str],
                    accent: Accent,
                    age: Duration| {
        let id = note_id_for(id_prefix, |candidate| taken.contains(candidate));
        taken.insert(id.clone());
        Note {
            id,
            title: title.to_string(),
            time_label: time_label.to_string(),
            period,
            items: items.iter().map(|s| s.to_string()).collect(),
            accent,
            updated_at: now - age,
        }
    };

    let notes = vec![
        note(
            "reminders",
            "Reminders",
            "8:00 PM",
            Period::Today,
            &[
                "Dentist appointment on Tuesday",
                "Submit report by end of the day",
                "Send email to boss",
                "Pick up groceries",
            ],
            Accent::Lavender,
            Duration::zero(),
        ),
        note(
            "random-thoughts",
            "Random Thoughts",
            "9:45 PM",
            Period::Today,
            &[
                "Success is a journey, not a destination.",
                "Try a new recipe this weekend!",
                "Don't forget to water the plants.",
            ],
            Accent::Mint,
            Duration::hours(2),
        ),
        note(
            "books",
            "Books to Read",
            "9:00 AM",
            Period::ThisWeek,
            &["The Power of Habit", "Atomic Habits", "The Alchemist"],
            Accent::Sunrise,
            Duration::hours(24),
        ),
        note(
            "ideas",
            "Ideas",
            "4:30 PM",
            Period::ThisMonth,
            &[
                "Launch a monthly newsletter",
                "Plan a team off-site",
                "Explore UI animation concepts",
            ],
            Accent::Peach,
            Duration::hours(72),
        ),
    ];

    let folder = |id: &str, name: &str, abbreviation: &str, age: Duration, is_recent: bool| Folder {
        id: id.to_string(),
        name: name.to_string(),
        abbreviation: abbreviation.to_string(),
        accent: Accent::Sunrise,
        updated_at: now - age,
        is_recent,
    };

    let folders = vec![
        folder("bucket-list", "Bucket List", "BL", Duration::zero(), true),
        folder("finances", "Finances", "Fi", Duration::hours(12), true),
        folder("travel", "Travel Plans", "TP", Duration::days(2), true),
        folder("shopping", "Shopping", "Sh", Duration::days(5), false),
        folder("personal", "Personal", "Pe", Duration::days(6), false),
        folder("work", "Work", "Wo", Duration::days(7), false),
    ];

    NotesState { notes, folders }
}

/// Suggestions offered by the quick-create action.
pub fn suggestions() -> Vec<NoteDraft> {
    let draft = |title: &str, time_label: &str, items: &[&str], period, accent| NoteDraft {
        title: title.to_string(),
        time_label: time_label.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
        period,
        accent,
    };
    vec![
        draft(
            "Daily Reflections",
            "7:30 PM",
            &["Highlight of the day", "One thing I learned", "Gratitude moment"],
            Period::Today,
            Accent::Mint,
        ),
        draft(
            "Weekend Prep",
            "Friday 5:00 PM",
            &["Plan a hike route", "Call the grandparents", "Prep grocery list"],
            Period::ThisWeek,
            Accent::Peach,
        ),
        draft(
            "Reading List",
            "Anytime",
            &["Finish blog draft", "Review design notes", "Sketch new hero layout"],
            Period::ThisMonth,
            Accent::Lavender,
        ),
    ]
}
