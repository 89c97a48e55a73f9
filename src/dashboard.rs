use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::derive::derive_sorted;
use crate::loader::{LoadHandle, LoadPoll, TaskSource};
use crate::metrics::compute_metrics;
use crate::models::{DerivedTask, Metrics, Task, TaskDraft, TaskId, TaskPatch};
use crate::store::TaskStore;

/// Everything the rendering layer reads, recomputed on each call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub derived_sorted: Vec<DerivedTask>,
    pub metrics: Metrics,
    pub loading: bool,
    pub error: Option<String>,
    pub last_deleted: Option<Task>,
}

/// Owns the task store and the state of the one-time initial load.
///
/// A new dashboard reports `loading` until its initial load has finished
/// or failed.
///
/// All mutations take `&mut self`, so they are serialized by ownership.
/// Share across threads by wrapping the whole dashboard in a single `Mutex`.
pub struct Dashboard {
    store: TaskStore,
    target_rate: f64,
    loading: bool,
    error: Option<String>,
    load: Option<LoadHandle>,
    load_started: bool,
}

impl Dashboard {
    pub fn new(store: TaskStore, config: &Config) -> Self {
        Dashboard {
            store,
            target_rate: config.target_rate,
            loading: true,
            error: None,
            load: None,
            load_started: false,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn target_rate(&self) -> f64 {
        self.target_rate
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts the initial load in the background. Only the first call has any effect.
    pub fn begin_load<S: TaskSource>(&mut self, source: S) {
        if self.load_started {
            warn!("initial load already started; ignoring");
            return;
        }
        self.load_started = true;
        self.loading = true;
        self.load = Some(LoadHandle::spawn(source));
    }

    /// Applies the load result if it has arrived. Returns true when state changed.
    pub fn poll_load(&mut self) -> bool {
        let outcome = match &self.load {
            Some(handle) => handle.poll(),
            None => return false,
        };
        self.finish_load(outcome)
    }

    /// Blocks until the in-flight load completes and applies it.
    pub fn wait_load(&mut self) {
        let outcome = match &self.load {
            Some(handle) => handle.wait(),
            None => return,
        };
        self.finish_load(outcome);
    }

    fn finish_load(&mut self, outcome: LoadPoll) -> bool {
        match outcome {
            LoadPoll::Pending => false,
            LoadPoll::Cancelled => {
                self.load = None;
                false
            }
            LoadPoll::Ready(Ok(raw)) => {
                self.store.load(&raw);
                info!(count = self.store.len(), "tasks loaded");
                self.loading = false;
                self.load = None;
                true
            }
            LoadPoll::Ready(Err(e)) => {
                warn!(error = %e, "task load failed");
                self.error = Some(e.to_string());
                self.loading = false;
                self.load = None;
                true
            }
        }
    }

    /// Cancels any in-flight load so a late result is never applied.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.load.take() {
            handle.cancel();
        }
    }

    pub fn derived_sorted(&self) -> Vec<DerivedTask> {
        derive_sorted(self.store.tasks(), self.target_rate)
    }

    pub fn metrics(&self) -> Metrics {
        compute_metrics(self.store.tasks(), self.target_rate)
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            derived_sorted: self.derived_sorted(),
            metrics: self.metrics(),
            loading: self.loading,
            error: self.error.clone(),
            last_deleted: self.store.last_deleted().cloned(),
        }
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> TaskId {
        self.store.add(draft)
    }

    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) {
        self.store.update(id, patch);
    }

    pub fn delete_task(&mut self, id: &TaskId) {
        self.store.delete(id);
    }

    pub fn undo_delete(&mut self) {
        self.store.undo_delete();
    }

    pub fn clear_last_deleted(&mut self) {
        self.store.clear_last_deleted();
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.teardown();
    }
}
