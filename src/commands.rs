use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::loader::FileSource;
use crate::metrics::status_breakdown;
use crate::models::{PerformanceGrade, TaskStatus};
use crate::store::TaskStore;

/// Loads the configured tasks file synchronously.
///
/// Load failures are left on the dashboard's error state for the caller to report.
pub fn load_dashboard(config: &Config) -> Dashboard {
    let mut dash = Dashboard::new(TaskStore::default(), config);
    dash.begin_load(FileSource::new(&config.tasks_path));
    dash.wait_load();
    dash
}

fn grade_color(grade: PerformanceGrade) -> Color {
    match grade {
        PerformanceGrade::Excellent => Color::Green,
        PerformanceGrade::Good => Color::Cyan,
        PerformanceGrade::Fair => Color::Yellow,
        PerformanceGrade::NeedsImprovement => Color::Red,
    }
}

/// Lists tasks in a formatted table, best ROI first.
///
/// By default, hides finished tasks unless `all` is true.
pub fn cmd_list(config: &Config, all: bool) {
    let dash = load_dashboard(config);
    if let Some(e) = dash.error() {
        eprintln!("{}", e);
        return;
    }

    let mut rows = dash.derived_sorted();
    if !all {
        rows.retain(|d| d.task.status != TaskStatus::Done);
    }
    if rows.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Revenue").add_attribute(Attribute::Bold),
            Cell::new("Hours").add_attribute(Attribute::Bold),
            Cell::new("ROI").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
            Cell::new("Grade").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for d in rows {
        let status_color = match d.task.status {
            TaskStatus::Done => Color::Green,
            TaskStatus::InProgress => Color::Cyan,
            TaskStatus::Todo => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(&d.task.id),
            Cell::new(&d.task.title),
            Cell::new(d.task.priority),
            Cell::new(format!("{:.2}", d.task.revenue)),
            Cell::new(format!("{:.1}", d.task.time_taken)),
            Cell::new(format!("{:.2}", d.roi)),
            Cell::new(format!("{} ({:.0}%)", d.time_value, d.time_value_score)),
            Cell::new(d.grade).fg(grade_color(d.grade)),
            Cell::new(d.task.status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Prints the aggregate metrics, or the snapshot as JSON when `json` is set.
pub fn cmd_metrics(config: &Config, json: bool) {
    let dash = load_dashboard(config);
    if let Some(e) = dash.error() {
        eprintln!("{}", e);
        return;
    }

    let m = dash.metrics();
    if json {
        match serde_json::to_string_pretty(&m) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Failed to serialize metrics: {}", e),
        }
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total revenue"), Cell::new(format!("{:.2}", m.total_revenue))]);
    table.add_row(vec![Cell::new("Total hours"), Cell::new(format!("{:.1}", m.total_time_taken))]);
    table.add_row(vec![Cell::new("Revenue / hour"), Cell::new(format!("{:.2}", m.revenue_per_hour))]);
    table.add_row(vec![
        Cell::new("Time efficiency"),
        Cell::new(format!("{:.1}% of {:.2}/h", m.time_efficiency_pct, dash.target_rate())),
    ]);
    table.add_row(vec![Cell::new("Average ROI"), Cell::new(format!("{:.2}", m.average_roi))]);
    table.add_row(vec![
        Cell::new("Performance"),
        Cell::new(m.performance_grade).fg(grade_color(m.performance_grade)),
    ]);
    for (status, count) in status_breakdown(dash.store().tasks()) {
        table.add_row(vec![Cell::new(format!("Tasks {}", status)), Cell::new(count)]);
    }
    println!("{table}");
}
