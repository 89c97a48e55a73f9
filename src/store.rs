use serde_json::Value;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::ids::{IdGenerator, UuidIds};
use crate::ingest::{normalize_tasks, sanitize_revenue, sanitize_time_taken};
use crate::models::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};

/// Owns the task collection (in insertion order) and the single-slot undo buffer.
pub struct TaskStore {
    tasks: Vec<Task>,
    last_deleted: Option<Task>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore::new(Box::new(SystemClock), Box::new(UuidIds))
    }
}

impl TaskStore {
    pub fn new(clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        TaskStore { tasks: Vec::new(), last_deleted: None, clock, ids }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn last_deleted(&self) -> Option<&Task> {
        self.last_deleted.as_ref()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replaces the whole collection with the normalized payload.
    ///
    /// The last-deleted slot is left alone.
    pub fn load(&mut self, raw: &Value) {
        let now = self.clock.now();
        self.tasks = normalize_tasks(raw, now, self.ids.as_mut());
        debug!(count = self.tasks.len(), "store loaded");
    }

    /// Appends a new task and returns its id.
    pub fn add(&mut self, draft: TaskDraft) -> TaskId {
        let now = self.clock.now();
        let id = match draft.id {
            Some(id) if self.get(&id).is_none() => id,
            Some(taken) => {
                let fresh = self.fresh_id();
                debug!(requested = %taken, assigned = %fresh, "id already in use");
                fresh
            }
            None => self.fresh_id(),
        };
        let task = Task {
            id: id.clone(),
            title: draft.title,
            revenue: sanitize_revenue(draft.revenue),
            time_taken: sanitize_time_taken(draft.time_taken),
            priority: draft.priority,
            status: draft.status,
            notes: draft.notes,
            created_at: now,
            completed_at: draft.status.is_done().then_some(now),
        };
        debug!(id = %id, "task added");
        self.tasks.push(task);
        id
    }

    /// Next generated id that no stored task uses.
    fn fresh_id(&mut self) -> TaskId {
        loop {
            let id = self.ids.next_id();
            if self.get(&id).is_none() {
                return id;
            }
            debug!(id = %id, "generated id already in use; drawing another");
        }
    }

    /// Merges `patch` into the task with `id`. Unknown ids are ignored.
    ///
    /// `completed_at` is stamped only on a transition from a non-done status
    /// into `Done`; otherwise it is left as it was.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) {
        let now = self.clock.now();
        let Some(t) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            debug!(id = %id, "update ignored: no such task");
            return;
        };

        if t.status != TaskStatus::Done && patch.status == Some(TaskStatus::Done) {
            t.completed_at = Some(now);
        }
        if let Some(title) = patch.title { t.title = title; }
        if let Some(r) = patch.revenue { t.revenue = sanitize_revenue(r); }
        if let Some(h) = patch.time_taken { t.time_taken = sanitize_time_taken(h); }
        if let Some(p) = patch.priority { t.priority = p; }
        if let Some(s) = patch.status { t.status = s; }
        if let Some(n) = patch.notes { t.notes = n; }
        debug!(id = %id, "task updated");
    }

    /// Removes the task with `id` and puts it in the last-deleted slot.
    ///
    /// The slot is overwritten even when nothing matched, which disables undo.
    pub fn delete(&mut self, id: &TaskId) {
        let removed = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .map(|idx| self.tasks.remove(idx));
        debug!(id = %id, found = removed.is_some(), "delete");
        self.last_deleted = removed;
    }

    /// Re-appends the last deleted task at the end of the collection.
    pub fn undo_delete(&mut self) {
        let Some(task) = self.last_deleted.take() else {
            return;
        };
        if self.get(&task.id).is_some() {
            // an add reused the id in the meantime
            debug!(id = %task.id, "undo skipped: id is back in use");
            return;
        }
        debug!(id = %task.id, "delete undone");
        self.tasks.push(task);
    }

    pub fn clear_last_deleted(&mut self) {
        self.last_deleted = None;
    }
}
