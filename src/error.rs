use std::path::PathBuf;

use thiserror::Error;

/// Failure of the one-shot task load. The `Display` text is what the
/// dashboard shows to the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load tasks from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load tasks: invalid JSON ({0})")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to load tasks: loader stopped without a result")]
    Disconnected,
}
