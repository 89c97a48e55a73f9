use std::path::PathBuf;

use tracing::warn;

/// Revenue per hour that counts as 100% efficient when nothing else is configured.
pub const DEFAULT_TARGET_RATE: f64 = 50.0;

/// Runtime settings for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding the initial task list.
    pub tasks_path: PathBuf,
    /// Baseline revenue per hour used by time-value scoring and time efficiency.
    pub target_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config { tasks_path: PathBuf::from("tasks.json"), target_rate: DEFAULT_TARGET_RATE }
    }
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// The tasks file is resolved in the following order:
    /// 1. `TASKDASH_TASKS` environment variable.
    /// 2. `~/.local/share/taskdash/tasks.json` (on Linux).
    /// 3. `./tasks.json` (fallback).
    ///
    /// `TASKDASH_TARGET_RATE` overrides the target rate when it is a positive number.
    pub fn from_env() -> Self {
        let tasks_path = std::env::var("TASKDASH_TASKS").map(PathBuf::from).unwrap_or_else(|_| default_tasks_path());
        let target_rate = std::env::var("TASKDASH_TARGET_RATE")
            .ok()
            .and_then(|raw| match raw.parse::<f64>() {
                Ok(r) if r.is_finite() && r > 0.0 => Some(r),
                _ => {
                    warn!(value = %raw, "ignoring invalid TASKDASH_TARGET_RATE");
                    None
                }
            })
            .unwrap_or(DEFAULT_TARGET_RATE);
        Config { tasks_path, target_rate }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, tasks_path: Option<PathBuf>, target_rate: Option<f64>) -> Self {
        if let Some(p) = tasks_path {
            self.tasks_path = p;
        }
        match target_rate {
            Some(r) if r.is_finite() && r > 0.0 => self.target_rate = r,
            Some(r) => warn!(value = r, "ignoring non-positive target rate"),
            None => {}
        }
        self
    }
}

/// Resolves the default location without touching the filesystem.
fn default_tasks_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(p) => p.join("taskdash").join("tasks.json"),
        None => PathBuf::from("tasks.json"),
    }
}
