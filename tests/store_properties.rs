use chrono::{DateTime, Duration, TimeZone, Utc};
use notefold::seed::default_state;
use notefold::store::load_snapshot;
use notefold::{
    Accent, Clock, FileStore, FolderFilter, KeyValueStore, MemoryStore, NoteDraft, NotePatch,
    NotesState, NotesStore, Period, StateOrigin, DEFAULT_STORAGE_KEY,
};
use std::cell::Cell;
use std::collections::HashSet;
use tempfile::tempdir;

struct TickClock {
    start: DateTime<Utc>,
    ticks: Cell<i64>,
}

impl Clock for TickClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.get();
        self.ticks.set(tick + 1);
        self.start + Duration::minutes(tick)
    }
}

fn clock() -> Box<dyn Clock> {
    Box::new(TickClock {
        start: Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
        ticks: Cell::new(0),
    })
}

fn store() -> NotesStore<MemoryStore> {
    NotesStore::initialize_with_clock(MemoryStore::new(), DEFAULT_STORAGE_KEY, clock())
}

fn draft(title: &str, period: Period) -> NoteDraft {
    NoteDraft {
        title: title.to_string(),
        time_label: "7:15 AM".to_string(),
        items: vec!["one".to_string(), "two".to_string()],
        period,
        accent: Accent::Peach,
    }
}

fn persisted<S: KeyValueStore>(store: &NotesStore<S>) -> NotesState {
    load_snapshot(store.backend(), DEFAULT_STORAGE_KEY).expect("snapshot should be persisted")
}

#[test]
fn loading_twice_yields_the_same_state() {
    let first = store();
    let backend = first.into_backend();
    let second = NotesStore::initialize(backend, DEFAULT_STORAGE_KEY);
    assert_eq!(second.origin(), StateOrigin::Restored);
    let snapshot = second.state().clone();
    let third = NotesStore::initialize(second.into_backend(), DEFAULT_STORAGE_KEY);
    assert_eq!(third.state(), &snapshot);
}

#[test]
fn empty_backend_is_seeded_and_persisted() {
    let store = store();
    assert_eq!(store.origin(), StateOrigin::Seeded);
    let titles: Vec<&str> = store.notes().iter().map(|n| n.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Reminders", "Random Thoughts", "Books to Read", "Ideas"]
    );
    assert_eq!(store.folders().len(), 6);
    assert_eq!(&persisted(&store), store.state());
}

#[test]
fn ids_stay_unique_across_same_title_creates() {
    let mut store = store();
    for _ in 0..25 {
        store.create_note(draft("Reminders", Period::Today));
    }
    let ids: HashSet<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), store.notes().len());
    assert!(store.notes()[0].id.starts_with("reminders-"));
}

#[test]
fn create_prepends_and_keeps_the_rest() {
    let mut store = store();
    let before = store.notes().to_vec();
    let id = store.create_note(draft("Trip", Period::ThisWeek));
    assert_eq!(store.notes().len(), before.len() + 1);
    assert_eq!(store.notes()[0].id, id);
    assert_eq!(&store.notes()[1..], before.as_slice());
    assert_eq!(persisted(&store).notes[0].id, id);
}

#[test]
fn update_touches_only_the_target() {
    let mut store = store();
    let target = store.notes()[2].clone();
    let others: Vec<_> = store
        .notes()
        .iter()
        .filter(|n| n.id != target.id)
        .cloned()
        .collect();

    assert!(store.update_note(
        &target.id,
        NotePatch {
            title: Some("Books".to_string()),
            period: Some(Period::Today),
            ..NotePatch::default()
        }
    ));

    let updated = store.note(&target.id).unwrap();
    assert_eq!(updated.title, "Books");
    assert_eq!(updated.period, Period::Today);
    assert_eq!(updated.items, target.items);
    assert!(updated.updated_at > target.updated_at);
    assert_eq!(store.notes()[2].id, target.id);
    let after: Vec<_> = store
        .notes()
        .iter()
        .filter(|n| n.id != target.id)
        .cloned()
        .collect();
    assert_eq!(after, others);
}

#[test]
fn delete_removes_exactly_one_and_repeats_are_no_ops() {
    let mut store = store();
    let victim = store.notes()[1].id.clone();
    assert!(store.delete_note(&victim));
    assert_eq!(store.notes().len(), 3);
    assert!(store.note(&victim).is_none());
    let snapshot = store.state().clone();
    let writes = store.backend().writes();
    assert!(!store.delete_note(&victim));
    assert_eq!(store.state(), &snapshot);
    assert_eq!(store.backend().writes(), writes);
}

#[test]
fn period_buckets_partition_the_notes() {
    let mut store = store();
    store.create_note(draft("Monthly", Period::ThisMonth));
    store.create_note(draft("Weekly", Period::ThisWeek));
    let total: usize = Period::ALL
        .iter()
        .map(|p| store.notes_by_period(*p).len())
        .sum();
    assert_eq!(total, store.notes().len());
    for period in Period::ALL {
        assert!(store
            .notes_by_period(period)
            .iter()
            .all(|n| n.period == period));
    }
}

#[test]
fn recent_notes_follow_updates() {
    let mut store = store();
    let oldest = store.notes()[3].id.clone();
    store.update_note(&oldest, NotePatch::default());
    let recent = store.recent_notes(5);
    assert_eq!(recent[0].id, oldest);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));
    assert_eq!(store.recent_notes(2).len(), 2);
    assert!(store.recent_notes(0).is_empty());
}

#[test]
fn folder_filters_select_and_order() {
    let store = store();
    assert_eq!(store.folders_by_filter(FolderFilter::All).len(), 6);
    let recent: Vec<&str> = store
        .folders_by_filter(FolderFilter::Recent)
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(recent, vec!["bucket-list", "finances", "travel"]);
    let by_time = store.folders_by_filter(FolderFilter::LastModified);
    assert!(by_time
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));
}

#[test]
fn snapshot_round_trips_through_json() {
    let state = default_state(Utc::now());
    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains("\"timeLabel\""));
    assert!(json.contains("\"updatedAt\""));
    assert!(json.contains("\"thisWeek\""));
    let back: NotesState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn unknown_ids_change_nothing() {
    let mut store = store();
    let snapshot = store.state().clone();
    assert!(!store.update_note(
        "nope",
        NotePatch {
            title: Some("ghost".to_string()),
            ..NotePatch::default()
        }
    ));
    assert!(!store.delete_note("nope"));
    assert_eq!(store.state(), &snapshot);
    assert_eq!(persisted(&store), snapshot);
}

#[test]
fn file_store_survives_a_restart() {
    let dir = tempdir().unwrap();
    let id = {
        let mut store = NotesStore::initialize(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
        assert_eq!(store.origin(), StateOrigin::Seeded);
        store.create_note(draft("Persisted", Period::ThisMonth))
    };
    assert!(dir.path().join("notes-app-state.json").exists());

    let store = NotesStore::initialize(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
    assert_eq!(store.origin(), StateOrigin::Restored);
    assert_eq!(store.notes()[0].id, id);
    assert_eq!(store.notes().len(), 5);
}
