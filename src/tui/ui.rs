use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::models::{PerformanceGrade, TaskStatus};
use super::app::{App, InputMode, InputField};

fn grade_style(grade: PerformanceGrade) -> Style {
    match grade {
        PerformanceGrade::Excellent => Style::default().fg(Color::Green),
        PerformanceGrade::Good => Style::default().fg(Color::Cyan),
        PerformanceGrade::Fair => Style::default().fg(Color::Yellow),
        PerformanceGrade::NeedsImprovement => Style::default().fg(Color::Red),
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Metrics
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let m = &app.view.metrics;
    let summary = format!(
        "Revenue: {:.2}   Hours: {:.1}   Rev/h: {:.2}\nEfficiency: {:.1}%   Avg ROI: {:.2}   Grade: {}",
        m.total_revenue, m.total_time_taken, m.revenue_per_hour,
        m.time_efficiency_pct, m.average_roi, m.performance_grade,
    );
    let metrics = Paragraph::new(summary)
        .style(grade_style(m.performance_grade))
        .block(Block::default().borders(Borders::ALL).title("Taskdash - Metrics"));
    f.render_widget(metrics, chunks[0]);

    if app.view.loading {
        let loading = Paragraph::new("Loading tasks...")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("Taskdash - Tasks"));
        f.render_widget(loading, chunks[1]);
    } else if let Some(err) = &app.view.error {
        let error = Paragraph::new(err.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Taskdash - Error"));
        f.render_widget(error, chunks[1]);
    } else {
        let rows: Vec<Row> = app
            .view
            .derived_sorted
            .iter()
            .map(|d| {
                let style = if d.task.status == TaskStatus::Done {
                    Style::default().fg(Color::DarkGray)
                } else {
                    grade_style(d.grade)
                };
                Row::new(vec![
                    Cell::from(d.task.title.clone()),
                    Cell::from(d.task.priority.to_string()),
                    Cell::from(format!("{:.2}", d.task.revenue)),
                    Cell::from(format!("{:.1}", d.task.time_taken)),
                    Cell::from(format!("{:.2}", d.roi)),
                    Cell::from(d.time_value.to_string()),
                    Cell::from(d.grade.to_string()),
                    Cell::from(d.task.status.to_string()),
                    Cell::from(d.task.notes.clone().unwrap_or_default()),
                ]).style(style)
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(Row::new(vec!["Title", "Priority", "Revenue", "Hours", "ROI", "Value", "Grade", "Status", "Notes"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1))
            .block(Block::default().borders(Borders::ALL).title("Taskdash - Tasks"))
            .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut app.state);
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match (&app.message, &app.view.last_deleted) {
            (Some(msg), _) => msg.clone(),
            (None, Some(t)) => format!("Deleted '{}'. z: Undo | x: Dismiss", t.title),
            (None, None) => "q: Quit | a: Add | s: Status | r: Revenue | h: Hours | n: Notes | d: Del | c: Toggle Done".to_string(),
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel".to_string(),
        InputMode::Adding => "Enter: Next Step | Esc: Cancel".to_string(),
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => "Add Task: Enter Title",
                1 => "Add Task: Enter Revenue",
                2 => "Add Task: Enter Hours Taken",
                3 => "Add Task: Enter Priority (Low/Medium/High)",
                _ => "Add Task: Enter Status (Todo/In Progress/Done)",
            },
            _ => match app.input_field {
                InputField::Revenue => "Edit Revenue",
                InputField::Hours => "Edit Hours Taken",
                InputField::Notes => "Edit Notes",
                InputField::None => "Edit",
            },
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
