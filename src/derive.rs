use std::cmp::Ordering;

use crate::models::{DerivedTask, PerformanceGrade, Task, TimeValue};

/// Maps an ROI (revenue per hour) to a grade.
///
/// - `>= 100`: Excellent
/// - `>= 50`: Good
/// - `>= 20`: Fair
/// - otherwise (including NaN): Needs Improvement
pub fn grade_for_roi(roi: f64) -> PerformanceGrade {
    if roi >= 100.0 {
        PerformanceGrade::Excellent
    } else if roi >= 50.0 {
        PerformanceGrade::Good
    } else if roi >= 20.0 {
        PerformanceGrade::Fair
    } else {
        PerformanceGrade::NeedsImprovement
    }
}

/// Classifies a time-value score (percent of the target rate).
pub fn time_value_for_score(score: f64) -> TimeValue {
    if score >= 100.0 {
        TimeValue::High
    } else if score >= 50.0 {
        TimeValue::Medium
    } else {
        TimeValue::Low
    }
}

/// Computes the derived fields of a task against `target_rate` revenue/hour.
pub fn with_derived(task: &Task, target_rate: f64) -> DerivedTask {
    // time_taken > 0 is guaranteed by the store
    let roi = task.revenue / task.time_taken;
    let time_value_score = roi / target_rate * 100.0;
    DerivedTask {
        task: task.clone(),
        roi,
        time_value_score,
        time_value: time_value_for_score(time_value_score),
        grade: grade_for_roi(roi),
    }
}

/// Orders tasks for display: best ROI first, then newest, then by id.
///
/// The order is total, so sorting an already sorted list is a no-op.
pub fn sort_tasks(mut tasks: Vec<DerivedTask>) -> Vec<DerivedTask> {
    tasks.sort_by(display_order);
    tasks
}

fn display_order(a: &DerivedTask, b: &DerivedTask) -> Ordering {
    b.roi
        .total_cmp(&a.roi)
        .then_with(|| b.task.created_at.cmp(&a.task.created_at))
        .then_with(|| a.task.id.cmp(&b.task.id))
}

/// Derives and sorts a whole collection.
pub fn derive_sorted(tasks: &[Task], target_rate: f64) -> Vec<DerivedTask> {
    sort_tasks(tasks.iter().map(|t| with_derived(t, target_rate)).collect())
}
