use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use taskdash::clock::{Clock, ManualClock};
use taskdash::ids::SequentialIds;
use taskdash::models::{Priority, TaskDraft, TaskId, TaskPatch, TaskStatus};
use taskdash::store::TaskStore;

fn test_store() -> (TaskStore, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
    let store = TaskStore::new(Box::new(clock.clone()), Box::new(SequentialIds::new("t")));
    (store, clock)
}

fn draft(title: &str, revenue: f64, hours: f64, status: TaskStatus) -> TaskDraft {
    TaskDraft {
        id: None,
        title: title.into(),
        revenue,
        time_taken: hours,
        priority: Priority::Medium,
        status,
        notes: None,
    }
}

fn ids(store: &TaskStore) -> Vec<String> {
    store.tasks().iter().map(|t| t.id.0.clone()).collect()
}

#[test]
fn test_add_generates_id_and_timestamps() {
    let (mut store, clock) = test_store();
    let id = store.add(draft("Write report", 200.0, 4.0, TaskStatus::Todo));

    assert_eq!(id, TaskId::new("t-1"));
    let t = store.get(&id).unwrap();
    assert_eq!(t.created_at, clock.now());
    assert_eq!(t.completed_at, None);
}

#[test]
fn test_add_done_sets_completed_at() {
    let (mut store, clock) = test_store();
    let id = store.add(draft("Shipped", 10.0, 1.0, TaskStatus::Done));
    assert_eq!(store.get(&id).unwrap().completed_at, Some(clock.now()));
}

#[test]
fn test_add_keeps_caller_id() {
    let (mut store, _) = test_store();
    let mut d = draft("Mine", 1.0, 1.0, TaskStatus::Todo);
    d.id = Some(TaskId::new("custom"));
    let id = store.add(d);
    assert_eq!(id, TaskId::new("custom"));
}

#[test]
fn test_add_replaces_id_already_in_use() {
    let (mut store, _) = test_store();
    let mut d = draft("First", 1.0, 1.0, TaskStatus::Todo);
    d.id = Some(TaskId::new("dup"));
    store.add(d.clone());
    let second = store.add(d);
    assert_ne!(second, TaskId::new("dup"));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_add_coerces_bad_hours_and_revenue() {
    let (mut store, _) = test_store();
    let a = store.add(draft("Zero", 10.0, 0.0, TaskStatus::Todo));
    let b = store.add(draft("NaN", f64::NAN, f64::NAN, TaskStatus::Todo));
    let c = store.add(draft("Negative", -5.0, -3.0, TaskStatus::Todo));

    for id in [a, b, c] {
        let t = store.get(&id).unwrap();
        assert_eq!(t.time_taken, 1.0);
        assert!(t.revenue >= 0.0);
    }
}

#[test]
fn test_update_merges_patch() {
    let (mut store, _) = test_store();
    let id = store.add(draft("Old", 10.0, 2.0, TaskStatus::Todo));
    store.update(&id, TaskPatch {
        title: Some("New".into()),
        revenue: Some(50.0),
        priority: Some(Priority::High),
        notes: Some(Some("call back".into())),
        ..Default::default()
    });

    let t = store.get(&id).unwrap();
    assert_eq!(t.title, "New");
    assert_eq!(t.revenue, 50.0);
    assert_eq!(t.time_taken, 2.0);
    assert_eq!(t.priority, Priority::High);
    assert_eq!(t.notes.as_deref(), Some("call back"));
}

#[test]
fn test_update_time_taken_stays_positive() {
    let (mut store, _) = test_store();
    let id = store.add(draft("A", 10.0, 2.0, TaskStatus::Todo));
    store.update(&id, TaskPatch { time_taken: Some(-1.0), ..Default::default() });
    assert_eq!(store.get(&id).unwrap().time_taken, 1.0);
}

#[test]
fn test_update_to_done_stamps_completed_at_once() {
    let (mut store, clock) = test_store();
    let id = store.add(draft("B", 50.0, 5.0, TaskStatus::Todo));

    clock.advance(Duration::hours(1));
    store.update(&id, TaskPatch::status(TaskStatus::Done));
    let first = store.get(&id).unwrap().completed_at;
    assert_eq!(first, Some(clock.now()));

    clock.advance(Duration::hours(1));
    store.update(&id, TaskPatch::status(TaskStatus::Done));
    assert_eq!(store.get(&id).unwrap().completed_at, first);
}

#[test]
fn test_completed_at_survives_status_regression() {
    let (mut store, _) = test_store();
    let id = store.add(draft("C", 1.0, 1.0, TaskStatus::Done));
    let stamped = store.get(&id).unwrap().completed_at;

    store.update(&id, TaskPatch::status(TaskStatus::Todo));
    let t = store.get(&id).unwrap();
    assert_eq!(t.status, TaskStatus::Todo);
    assert_eq!(t.completed_at, stamped);
}

#[test]
fn test_update_missing_id_is_noop() {
    let (mut store, _) = test_store();
    store.add(draft("A", 1.0, 1.0, TaskStatus::Todo));
    let before = store.tasks().to_vec();
    store.update(&TaskId::new("nope"), TaskPatch::status(TaskStatus::Done));
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn test_delete_then_undo_restores_membership() {
    let (mut store, _) = test_store();
    let a = store.add(draft("A", 1.0, 1.0, TaskStatus::Todo));
    store.add(draft("B", 1.0, 1.0, TaskStatus::Todo));
    store.add(draft("C", 1.0, 1.0, TaskStatus::Todo));

    store.delete(&a);
    assert_eq!(store.len(), 2);
    assert_eq!(store.last_deleted().map(|t| t.id.clone()), Some(a.clone()));

    store.undo_delete();
    assert_eq!(store.len(), 3);
    assert!(store.last_deleted().is_none());
    // restored at the end, not at its old position
    assert_eq!(ids(&store), vec!["t-2", "t-3", "t-1"]);
}

#[test]
fn test_undo_twice_restores_once() {
    let (mut store, _) = test_store();
    let a = store.add(draft("A", 1.0, 1.0, TaskStatus::Todo));
    store.add(draft("B", 1.0, 1.0, TaskStatus::Todo));
    store.delete(&a);

    store.undo_delete();
    store.undo_delete();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_delete_overwrites_slot() {
    let (mut store, _) = test_store();
    let a = store.add(draft("A", 1.0, 1.0, TaskStatus::Todo));
    let b = store.add(draft("B", 1.0, 1.0, TaskStatus::Todo));
    store.delete(&a);
    store.delete(&b);

    assert_eq!(store.last_deleted().map(|t| t.id.clone()), Some(b));
    store.undo_delete();
    assert_eq!(ids(&store), vec!["t-2"]);
}

#[test]
fn test_delete_missing_id_clears_slot() {
    let (mut store, _) = test_store();
    let a = store.add(draft("A", 1.0, 1.0, TaskStatus::Todo));
    store.add(draft("B", 1.0, 1.0, TaskStatus::Todo));
    store.delete(&a);

    store.delete(&TaskId::new("missing-id"));
    assert_eq!(store.len(), 1);
    assert!(store.last_deleted().is_none());

    store.undo_delete();
    assert_eq!(store.len(), 1);
}

#[test]
fn test_clear_last_deleted_disables_undo() {
    let (mut store, _) = test_store();
    let a = store.add(draft("A", 1.0, 1.0, TaskStatus::Todo));
    store.delete(&a);
    store.clear_last_deleted();
    store.undo_delete();
    assert!(store.is_empty());
}

#[test]
fn test_load_replaces_tasks_but_keeps_slot() {
    let (mut store, _) = test_store();
    let a = store.add(draft("A", 1.0, 1.0, TaskStatus::Todo));
    store.add(draft("B", 1.0, 1.0, TaskStatus::Todo));
    store.delete(&a);

    store.load(&json!([{ "id": "x", "title": "X", "revenue": 5, "timeTaken": 1, "status": "Todo" }]));
    assert_eq!(ids(&store), vec!["x"]);
    assert_eq!(store.last_deleted().map(|t| t.id.clone()), Some(a));
}

#[test]
fn test_update_can_clear_notes() {
    let (mut store, _) = test_store();
    let mut d = draft("A", 1.0, 1.0, TaskStatus::Todo);
    d.notes = Some("draft notes".into());
    let id = store.add(d);

    store.update(&id, TaskPatch { notes: Some(None), ..Default::default() });
    assert_eq!(store.get(&id).unwrap().notes, None);

    // absent field leaves notes untouched
    store.update(&id, TaskPatch { notes: Some(Some("again".into())), ..Default::default() });
    store.update(&id, TaskPatch::status(TaskStatus::Done));
    assert_eq!(store.get(&id).unwrap().notes.as_deref(), Some("again"));
}

#[test]
fn test_add_skips_generated_id_already_loaded() {
    let (mut store, _) = test_store();
    store.load(&json!([{ "id": "t-1", "title": "Loaded" }]));

    let id = store.add(draft("New", 1.0, 1.0, TaskStatus::Todo));
    assert_eq!(id, TaskId::new("t-2"));
    assert_eq!(ids(&store), vec!["t-1", "t-2"]);
}

#[test]
fn test_add_replacement_for_taken_id_is_unique() {
    let (mut store, _) = test_store();
    store.load(&json!([{ "id": "t-1" }, { "id": "t-2" }]));

    let mut d = draft("Clash", 1.0, 1.0, TaskStatus::Todo);
    d.id = Some(TaskId::new("t-1"));
    let id = store.add(d);
    assert_eq!(id, TaskId::new("t-3"));
}
