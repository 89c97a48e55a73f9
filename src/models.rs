use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque, immutable identifier of a task.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow state of a task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Lenient parse used at the ingestion boundary and by the TUI.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "todo" | "to do" | "pending" => Some(TaskStatus::Todo),
            "in progress" | "in-progress" | "inprogress" | "in_progress" | "doing" => {
                Some(TaskStatus::InProgress)
            }
            "done" | "completed" | "complete" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// The status that follows this one when cycling through the workflow.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }

    pub fn is_done(self) -> bool {
        self == TaskStatus::Done
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" | "med" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(s)
    }
}

/// Represents a single work item on the dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, never changed after creation.
    pub id: TaskId,
    pub title: String,
    /// Revenue attributed to the task. Never negative.
    pub revenue: f64,
    /// Hours spent on the task. Always greater than zero.
    pub time_taken: f64,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default)]
    pub notes: Option<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Set the first time the task reaches `Done`. Not cleared if the status regresses.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for creating a task. The store fills in `id` when absent, and the timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub id: Option<TaskId>,
    pub title: String,
    pub revenue: f64,
    pub time_taken: f64,
    pub priority: Priority,
    pub status: TaskStatus,
    pub notes: Option<String>,
}

/// Partial update of a task. Identity and timestamps are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub revenue: Option<f64>,
    pub time_taken: Option<f64>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        TaskPatch { status: Some(status), ..Default::default() }
    }
}

/// Qualitative grade, ordered from worst to best.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceGrade {
    #[default]
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for PerformanceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PerformanceGrade::NeedsImprovement => "Needs Improvement",
            PerformanceGrade::Fair => "Fair",
            PerformanceGrade::Good => "Good",
            PerformanceGrade::Excellent => "Excellent",
        };
        f.write_str(s)
    }
}

/// Classification of how well a task's hours were converted to revenue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeValue {
    Low,
    Medium,
    High,
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeValue::Low => "Low",
            TimeValue::Medium => "Medium",
            TimeValue::High => "High",
        };
        f.write_str(s)
    }
}

/// A task together with its computed, read-only fields.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTask {
    #[serde(flatten)]
    pub task: Task,
    pub roi: f64,
    /// ROI as a percentage of the target rate.
    pub time_value_score: f64,
    pub time_value: TimeValue,
    pub grade: PerformanceGrade,
}

/// Aggregate snapshot over the whole collection.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_revenue: f64,
    pub total_time_taken: f64,
    pub time_efficiency_pct: f64,
    pub revenue_per_hour: f64,
    #[serde(rename = "averageROI")]
    pub average_roi: f64,
    pub performance_grade: PerformanceGrade,
}
