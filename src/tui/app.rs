use ratatui::widgets::TableState;

use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardView};
use crate::loader::FileSource;
use crate::models::{Priority, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::store::TaskStore;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

#[derive(Clone, Copy, PartialEq)]
pub enum InputField {
    None,
    Revenue,
    Hours,
    Notes,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub revenue: f64,
    pub hours: f64,
    pub priority: Priority,
    pub step: usize, // 0: Title, 1: Revenue, 2: Hours, 3: Priority, 4: Status
}

pub struct App {
    pub dash: Dashboard,
    /// Snapshot rendered on the last frame.
    pub view: DashboardView,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<TaskId>,
    pub add_state: AddState,
    pub show_done: bool,
    /// One-line feedback shown in the help bar.
    pub message: Option<String>,
}

impl App {
    /// Creates the app and starts loading tasks in the background.
    pub fn new(config: &Config) -> App {
        let mut dash = Dashboard::new(TaskStore::default(), config);
        dash.begin_load(FileSource::new(&config.tasks_path));
        let view = dash.view();
        App {
            dash,
            view,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            show_done: true,
            message: None,
        }
    }

    /// Picks up a finished background load.
    pub fn tick(&mut self) {
        if self.dash.poll_load() {
            self.refresh();
        }
    }

    /// Recomputes the view after any store change and keeps the selection in range.
    pub fn refresh(&mut self) {
        let mut view = self.dash.view();
        if !self.show_done {
            view.derived_sorted.retain(|d| d.task.status != TaskStatus::Done);
        }
        self.view = view;
        let len = self.view.derived_sorted.len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.state
            .selected()
            .and_then(|i| self.view.derived_sorted.get(i))
            .map(|d| d.task.id.clone())
    }

    /// Selects the next row.
    pub fn next(&mut self) {
        let len = self.view.derived_sorted.len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row.
    pub fn previous(&mut self) {
        let len = self.view.derived_sorted.len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Moves the selected task to the next status.
    pub fn cycle_status(&mut self) {
        let Some(id) = self.selected_id() else { return; };
        let Some(current) = self.dash.store().get(&id).map(|t| t.status) else { return; };
        self.dash.update_task(&id, TaskPatch::status(current.next()));
        self.refresh();
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return; };
        self.dash.delete_task(&id);
        self.refresh();
    }

    pub fn undo_delete(&mut self) {
        if self.view.last_deleted.is_none() { return; }
        self.dash.undo_delete();
        self.message = Some("Task restored.".into());
        self.refresh();
    }

    pub fn dismiss_undo(&mut self) {
        self.dash.clear_last_deleted();
        self.message = None;
        self.refresh();
    }

    pub fn toggle_done(&mut self) {
        self.show_done = !self.show_done;
        self.refresh();
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn start_edit(&mut self, field: InputField) {
        let Some(id) = self.selected_id() else { return; };
        let Some(task) = self.dash.store().get(&id) else { return; };
        self.input_buffer = match field {
            InputField::Revenue => task.revenue.to_string(),
            InputField::Hours => task.time_taken.to_string(),
            InputField::Notes => task.notes.clone().unwrap_or_default(),
            InputField::None => String::new(),
        };
        self.target_id = Some(id);
        self.input_field = field;
        self.input_mode = InputMode::Editing;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles Enter in editing or adding mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Editing => self.submit_edit(),
            InputMode::Adding => self.advance_add(),
            InputMode::Normal => {}
        }
    }

    fn submit_edit(&mut self) {
        let input = self.input_buffer.trim().to_string();
        if let Some(id) = self.target_id.take() {
            let patch = match self.input_field {
                InputField::Revenue => match input.parse::<f64>() {
                    Ok(v) => TaskPatch { revenue: Some(v), ..Default::default() },
                    Err(_) => {
                        self.message = Some(format!("Invalid revenue '{}'", input));
                        TaskPatch::default()
                    }
                },
                InputField::Hours => match input.parse::<f64>() {
                    Ok(v) => TaskPatch { time_taken: Some(v), ..Default::default() },
                    Err(_) => {
                        self.message = Some(format!("Invalid hours '{}'", input));
                        TaskPatch::default()
                    }
                },
                InputField::Notes => {
                    let notes = (!input.is_empty()).then_some(input);
                    TaskPatch { notes: Some(notes), ..Default::default() }
                }
                InputField::None => TaskPatch::default(),
            };
            self.dash.update_task(&id, patch);
        }
        self.input_field = InputField::None;
        self.cancel_input();
        self.refresh();
    }

    fn advance_add(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => {
                if input.is_empty() { return; }
                self.add_state.title = input;
            }
            1 => match input.parse::<f64>() {
                Ok(v) => self.add_state.revenue = v,
                Err(_) if input.is_empty() => self.add_state.revenue = 0.0,
                Err(_) => return,
            },
            2 => match input.parse::<f64>() {
                Ok(v) => self.add_state.hours = v,
                Err(_) if input.is_empty() => self.add_state.hours = 1.0,
                Err(_) => return,
            },
            3 => {
                if !input.is_empty() {
                    match Priority::parse(&input) {
                        Some(p) => self.add_state.priority = p,
                        None => return,
                    }
                }
            }
            _ => {
                let status = if input.is_empty() {
                    TaskStatus::Todo
                } else {
                    match TaskStatus::parse(&input) {
                        Some(s) => s,
                        None => return,
                    }
                };
                let draft = TaskDraft {
                    id: None,
                    title: std::mem::take(&mut self.add_state.title),
                    revenue: self.add_state.revenue,
                    time_taken: self.add_state.hours,
                    priority: self.add_state.priority,
                    status,
                    notes: None,
                };
                self.dash.add_task(draft);
                self.cancel_input();
                self.refresh();
                return;
            }
        }
        self.add_state.step += 1;
        self.input_buffer.clear();
    }
}
