use std::fs;
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use taskdash::clock::ManualClock;
use taskdash::config::Config;
use taskdash::dashboard::Dashboard;
use taskdash::error::LoadError;
use taskdash::ids::SequentialIds;
use taskdash::loader::{FileSource, LoadHandle, LoadPoll, StaticSource, TaskSource};
use taskdash::models::{PerformanceGrade, TaskDraft, TaskId, TaskPatch, TaskStatus};
use taskdash::store::TaskStore;

fn dashboard() -> Dashboard {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap());
    let store = TaskStore::new(Box::new(clock), Box::new(SequentialIds::new("d")));
    Dashboard::new(store, &Config::default())
}

fn sample() -> Value {
    json!([
        { "id": "a", "title": "A", "revenue": 100, "timeTaken": 2, "status": "Done" },
        { "id": "b", "title": "B", "revenue": 50, "timeTaken": 5, "status": "Todo" },
    ])
}

/// Source that only answers once the test lets it.
struct GatedSource {
    gate: Mutex<Receiver<()>>,
    payload: Value,
}

impl TaskSource for GatedSource {
    fn fetch(&self) -> Result<Value, LoadError> {
        let _ = self.gate.lock().unwrap().recv();
        Ok(self.payload.clone())
    }
}

#[test]
fn test_new_dashboard_starts_loading() {
    let dash = dashboard();
    let view = dash.view();
    assert!(view.loading);
    assert!(view.error.is_none());
    assert!(view.derived_sorted.is_empty());
}

#[test]
fn test_load_from_static_source() {
    let mut dash = dashboard();
    dash.begin_load(StaticSource(sample()));
    assert!(dash.is_loading());

    dash.wait_load();
    let view = dash.view();
    assert!(!view.loading);
    assert!(view.error.is_none());
    assert_eq!(view.derived_sorted.len(), 2);
    assert_eq!(view.derived_sorted[0].task.id, TaskId::new("a"));
    assert_eq!(view.metrics.total_revenue, 150.0);
    assert_eq!(view.metrics.average_roi, 30.0);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, sample().to_string()).unwrap();

    let mut dash = dashboard();
    dash.begin_load(FileSource::new(&path));
    dash.wait_load();
    assert_eq!(dash.store().len(), 2);
}

#[test]
fn test_missing_file_surfaces_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut dash = dashboard();
    dash.begin_load(FileSource::new(dir.path().join("nope.json")));
    dash.wait_load();

    assert!(!dash.is_loading());
    assert!(dash.error().unwrap().starts_with("Failed to load tasks"));
    assert!(dash.store().is_empty());
    assert_eq!(dash.metrics().performance_grade, PerformanceGrade::NeedsImprovement);
}

#[test]
fn test_invalid_json_surfaces_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "[{ not json").unwrap();

    let mut dash = dashboard();
    dash.begin_load(FileSource::new(&path));
    dash.wait_load();
    assert!(dash.error().is_some());
    assert!(dash.store().is_empty());
}

#[test]
fn test_second_load_is_ignored() {
    let mut dash = dashboard();
    dash.begin_load(StaticSource(sample()));
    dash.wait_load();
    dash.begin_load(StaticSource(json!([])));
    dash.wait_load();
    assert_eq!(dash.store().len(), 2);
}

#[test]
fn test_late_load_after_teardown_is_dropped() {
    let (tx, rx) = mpsc::channel();
    let mut dash = dashboard();
    dash.begin_load(GatedSource { gate: Mutex::new(rx), payload: sample() });
    assert!(!dash.poll_load());

    dash.teardown();
    tx.send(()).unwrap();
    thread::sleep(Duration::from_millis(50));

    assert!(!dash.poll_load());
    assert!(dash.store().is_empty());
    assert!(dash.error().is_none());
}

#[test]
fn test_cancelled_handle_reports_cancelled() {
    let (tx, rx) = mpsc::channel();
    let handle = LoadHandle::spawn(GatedSource { gate: Mutex::new(rx), payload: sample() });
    handle.cancel();
    tx.send(()).unwrap();
    assert!(matches!(handle.wait(), LoadPoll::Cancelled));
}

#[test]
fn test_mutations_recompute_view() {
    let mut dash = dashboard();
    dash.begin_load(StaticSource(sample()));
    dash.wait_load();

    let b = TaskId::new("b");
    dash.update_task(&b, TaskPatch { revenue: Some(1000.0), ..Default::default() });
    assert_eq!(dash.view().derived_sorted[0].task.id, b);

    let c = dash.add_task(TaskDraft { title: "C".into(), revenue: 10.0, time_taken: 1.0, ..Default::default() });
    assert_eq!(c, TaskId::new("d-1"));
    assert_eq!(dash.view().derived_sorted.len(), 3);

    dash.delete_task(&c);
    let view = dash.view();
    assert_eq!(view.derived_sorted.len(), 2);
    assert_eq!(view.last_deleted.as_ref().map(|t| t.id.clone()), Some(c.clone()));

    dash.undo_delete();
    let view = dash.view();
    assert_eq!(view.derived_sorted.len(), 3);
    assert!(view.last_deleted.is_none());

    dash.delete_task(&c);
    dash.clear_last_deleted();
    dash.undo_delete();
    assert_eq!(dash.store().len(), 2);
}

#[test]
fn test_update_to_done_via_dashboard() {
    let mut dash = dashboard();
    dash.begin_load(StaticSource(sample()));
    dash.wait_load();

    let b = TaskId::new("b");
    assert!(dash.store().get(&b).unwrap().completed_at.is_none());
    dash.update_task(&b, TaskPatch::status(TaskStatus::Done));
    let stamped = dash.store().get(&b).unwrap().completed_at;
    assert_eq!(stamped, Some(Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()));
}

#[test]
fn test_view_serializes_camel_case() {
    let mut dash = dashboard();
    dash.begin_load(StaticSource(sample()));
    dash.wait_load();

    let v = serde_json::to_value(dash.view()).unwrap();
    assert_eq!(v["metrics"]["totalRevenue"], json!(150.0));
    assert_eq!(v["metrics"]["averageROI"], json!(30.0));
    assert_eq!(v["derivedSorted"][0]["timeTaken"], json!(2.0));
    assert_eq!(v["derivedSorted"][0]["status"], json!("Done"));
    assert_eq!(v["metrics"]["performanceGrade"], json!("Fair"));
}
