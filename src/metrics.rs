use crate::derive::grade_for_roi;
use crate::models::{Metrics, PerformanceGrade, Task, TaskStatus};

/// Sum of revenue; `0` for an empty collection.
pub fn compute_total_revenue(tasks: &[Task]) -> f64 {
    tasks.iter().map(|t| t.revenue).sum()
}

pub fn compute_total_time_taken(tasks: &[Task]) -> f64 {
    tasks.iter().map(|t| t.time_taken).sum()
}

/// Revenue per hour over the whole collection. `None` when no time was logged,
/// which only happens for an empty collection.
pub fn compute_revenue_per_hour(tasks: &[Task]) -> Option<f64> {
    let hours = compute_total_time_taken(tasks);
    (hours > 0.0).then(|| compute_total_revenue(tasks) / hours)
}

/// Aggregate revenue per hour as a percentage of `target_rate`.
///
/// Not clamped: a collection earning twice the target reports 200.
pub fn compute_time_efficiency(tasks: &[Task], target_rate: f64) -> f64 {
    match compute_revenue_per_hour(tasks) {
        Some(rate) => rate / target_rate * 100.0,
        None => 0.0,
    }
}

/// Unweighted mean of per-task ROI; `0` for an empty collection.
pub fn compute_average_roi(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let sum: f64 = tasks.iter().map(|t| t.revenue / t.time_taken).sum();
    sum / tasks.len() as f64
}

/// Grade for an average ROI, using the same thresholds as individual tasks.
pub fn compute_performance_grade(avg_roi: f64) -> PerformanceGrade {
    grade_for_roi(avg_roi)
}

/// Full snapshot. An empty collection gets the all-zero baseline.
pub fn compute_metrics(tasks: &[Task], target_rate: f64) -> Metrics {
    if tasks.is_empty() {
        return Metrics::default();
    }
    let average_roi = compute_average_roi(tasks);
    Metrics {
        total_revenue: compute_total_revenue(tasks),
        total_time_taken: compute_total_time_taken(tasks),
        time_efficiency_pct: compute_time_efficiency(tasks, target_rate),
        revenue_per_hour: compute_revenue_per_hour(tasks).unwrap_or(0.0),
        average_roi,
        performance_grade: compute_performance_grade(average_roi),
    }
}

/// Number of tasks in each status, in workflow order.
pub fn status_breakdown(tasks: &[Task]) -> Vec<(TaskStatus, usize)> {
    TaskStatus::ALL
        .iter()
        .map(|s| (*s, tasks.iter().filter(|t| t.status == *s).count()))
        .collect()
}
