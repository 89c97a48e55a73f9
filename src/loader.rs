use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use serde_json::Value;
use tracing::debug;

use crate::error::LoadError;

/// Where the initial task payload comes from.
pub trait TaskSource: Send + 'static {
    fn fetch(&self) -> Result<Value, LoadError>;
}

/// Reads the payload from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl TaskSource for FileSource {
    fn fetch(&self) -> Result<Value, LoadError> {
        let s = fs::read_to_string(&self.path)
            .map_err(|source| LoadError::Io { path: self.path.clone(), source })?;
        Ok(serde_json::from_str(&s)?)
    }
}

/// Payload already in memory. Handy for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticSource(pub Value);

impl TaskSource for StaticSource {
    fn fetch(&self) -> Result<Value, LoadError> {
        Ok(self.0.clone())
    }
}

/// Outcome of polling an in-flight load.
#[derive(Debug)]
pub enum LoadPoll {
    Pending,
    Ready(Result<Value, LoadError>),
    /// The load was cancelled; whatever it produced is dropped.
    Cancelled,
}

/// A single fetch running on a background thread.
///
/// Once [`LoadHandle::cancel`] has been called, a result that arrives later
/// is never handed to the caller.
pub struct LoadHandle {
    rx: Receiver<Result<Value, LoadError>>,
    cancelled: Arc<AtomicBool>,
}

impl LoadHandle {
    pub fn spawn<S: TaskSource>(source: S) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        thread::spawn(move || {
            let result = source.fetch();
            if flag.load(Ordering::Acquire) {
                debug!("load finished after cancellation; dropping result");
                return;
            }
            // receiver gone means the owner was torn down
            let _ = tx.send(result);
        });
        LoadHandle { rx, cancelled }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> LoadPoll {
        if self.is_cancelled() {
            return LoadPoll::Cancelled;
        }
        match self.rx.try_recv() {
            Ok(result) => LoadPoll::Ready(result),
            Err(TryRecvError::Empty) => LoadPoll::Pending,
            Err(TryRecvError::Disconnected) => LoadPoll::Ready(Err(LoadError::Disconnected)),
        }
    }

    /// Blocks until the result arrives.
    pub fn wait(&self) -> LoadPoll {
        if self.is_cancelled() {
            return LoadPoll::Cancelled;
        }
        match self.rx.recv() {
            Ok(result) if !self.is_cancelled() => LoadPoll::Ready(result),
            Ok(_) => LoadPoll::Cancelled,
            Err(_) => LoadPoll::Ready(Err(LoadError::Disconnected)),
        }
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
