//! Boundary between the untyped task payload and [`Task`].
//!
//! Nothing past this module sees raw JSON. A malformed record never fails
//! the load; every field falls back to a safe default instead.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::ids::IdGenerator;
use crate::models::{Priority, Task, TaskId, TaskStatus};

/// Returns `hours` if it is finite and positive, otherwise `1.0`.
pub fn sanitize_time_taken(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 { hours } else { 1.0 }
}

/// Returns `revenue` if it is finite and not negative, otherwise `0.0`.
pub fn sanitize_revenue(revenue: f64) -> f64 {
    if revenue.is_finite() && revenue > 0.0 { revenue } else { 0.0 }
}

/// Normalizes a raw payload into tasks.
///
/// A payload that is not an array yields no tasks. Records missing a
/// `createdAt` get `now` minus one day per position, so list order is
/// preserved and timestamps don't collide. Missing or duplicate ids are
/// replaced with fresh ones from `ids`.
pub fn normalize_tasks(input: &Value, now: DateTime<Utc>, ids: &mut dyn IdGenerator) -> Vec<Task> {
    let records = match input.as_array() {
        Some(a) => a.as_slice(),
        None => {
            warn!("task payload is not an array; treating it as empty");
            &[]
        }
    };

    let empty = Map::new();
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let obj = record.as_object().unwrap_or_else(|| {
            warn!(index = idx, "task record is not an object; using defaults");
            &empty
        });
        let mut task = normalize_record(obj, idx, now, ids);
        if seen.contains(&task.id) {
            let mut fresh = ids.next_id();
            while seen.contains(&fresh) {
                fresh = ids.next_id();
            }
            warn!(index = idx, duplicate = %task.id, replacement = %fresh, "duplicate task id");
            task.id = fresh;
        }
        seen.insert(task.id.clone());
        tasks.push(task);
    }

    debug!(count = tasks.len(), "normalized task payload");
    tasks
}

fn normalize_record(obj: &Map<String, Value>, idx: usize, now: DateTime<Utc>, ids: &mut dyn IdGenerator) -> Task {
    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => TaskId(s.clone()),
        Some(Value::Number(n)) => TaskId(n.to_string()),
        _ => ids.next_id(),
    };

    let created_at = match obj.get("createdAt").filter(|v| !v.is_null()) {
        Some(v) => parse_timestamp(v).unwrap_or_else(|| {
            warn!(index = idx, value = %v, "unparseable createdAt; using positional fallback");
            now - Duration::days(idx as i64)
        }),
        None => now - Duration::days(idx as i64),
    };

    let time_taken = match obj.get("timeTaken").and_then(Value::as_f64) {
        Some(h) if h.is_finite() && h > 0.0 => h,
        other => {
            debug!(index = idx, value = ?other, "timeTaken missing or not positive; defaulting to 1");
            1.0
        }
    };

    let revenue = sanitize_revenue(obj.get("revenue").and_then(Value::as_f64).unwrap_or(0.0));

    let status = match obj.get("status").and_then(Value::as_str) {
        Some(s) => TaskStatus::parse(s).unwrap_or_else(|| {
            warn!(index = idx, status = s, "unknown status; treating as Todo");
            TaskStatus::Todo
        }),
        None => TaskStatus::Todo,
    };

    let priority = obj
        .get("priority")
        .and_then(Value::as_str)
        .and_then(Priority::parse)
        .unwrap_or_default();

    let completed_at = if status.is_done() {
        Some(obj.get("completedAt").and_then(parse_timestamp).unwrap_or(created_at))
    } else {
        None
    };

    Task {
        id,
        title: obj.get("title").and_then(Value::as_str).unwrap_or_default().to_string(),
        revenue,
        time_taken,
        priority,
        status,
        notes: obj.get("notes").and_then(Value::as_str).map(str::to_string),
        created_at,
        completed_at,
    }
}

/// Accepts RFC 3339 strings, bare `YYYY-MM-DD` dates and epoch milliseconds.
fn parse_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
