use uuid::Uuid;

use crate::models::TaskId;

/// Supplies process-unique identifiers for tasks created without one.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> TaskId;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> TaskId {
        TaskId(Uuid::new_v4().to_string())
    }
}

/// Predictable ids of the form `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds { prefix: prefix.into(), next: 1 }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> TaskId {
        let id = TaskId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
