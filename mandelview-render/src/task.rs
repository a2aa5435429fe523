use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::engine::{self, ComputeParams};
use crate::error::RenderError;
use crate::grid::IterationGrid;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// State shared between the UI thread and one background computation.
///
/// `percent` only ever grows. `finished` is published with release ordering
/// after the result has been sent, so a reader that observes it with acquire
/// ordering will find the result waiting on the channel.
#[derive(Debug, Default)]
pub struct TaskProgress {
    percent: AtomicU32,
    finished: AtomicBool,
    cancelled: AtomicBool,
}

impl TaskProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the progress to `percent` (clamped to 100). Lower values are ignored.
    pub fn report(&self, percent: u32) {
        self.percent.fetch_max(percent.min(100), Ordering::Relaxed);
    }

    pub fn percent(&self) -> u32 {
        self.percent.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// What a background computation sends back.
#[derive(Debug)]
pub struct TaskOutput {
    pub params: ComputeParams,
    pub result: crate::Result<IterationGrid>,
    pub elapsed: Duration,
}

/// One computation running on its own named thread.
///
/// Dropping the handle detaches the thread; it still runs to completion (or
/// to the next row boundary if cancelled) and its output is discarded.
#[derive(Debug)]
pub struct ComputeHandle {
    progress: Arc<TaskProgress>,
    rx: mpsc::Receiver<TaskOutput>,
    thread: JoinHandle<()>,
}

impl ComputeHandle {
    /// Start computing `params` into `grid` on a new thread.
    pub fn spawn(params: ComputeParams, grid: IterationGrid) -> crate::Result<Self> {
        let progress = Arc::new(TaskProgress::new());
        let (tx, rx) = mpsc::channel();
        let worker_progress = Arc::clone(&progress);

        let thread = thread::Builder::new()
            .name("escape-time".into())
            .spawn(move || {
                let start = Instant::now();
                let result = engine::compute(&params, grid, &worker_progress);
                let output = TaskOutput {
                    params,
                    result,
                    elapsed: start.elapsed(),
                };
                if tx.send(output).is_err() {
                    debug!("Compute handle dropped before completion");
                }
                worker_progress.mark_finished();
            })
            .map_err(RenderError::Spawn)?;

        Ok(Self {
            progress,
            rx,
            thread,
        })
    }

    /// Progress in percent, `0..=100`.
    pub fn progress(&self) -> u32 {
        self.progress.percent()
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }

    pub fn cancel(&self) {
        self.progress.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.progress.is_cancelled()
    }

    /// Take the output once [`is_finished`](Self::is_finished) holds.
    pub fn try_take(&mut self) -> Option<TaskOutput> {
        if !self.is_finished() {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// The thread exited without ever publishing a result (it panicked).
    pub fn is_lost(&self) -> bool {
        self.thread.is_finished() && !self.progress.is_finished()
    }
}
