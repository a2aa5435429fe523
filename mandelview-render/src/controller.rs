use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::engine::ComputeParams;
use crate::error::RenderError;
use crate::grid::IterationGrid;
use crate::task::ComputeHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    PendingCompute,
    ResultReady,
}

/// What one [`ComputeController::poll`] observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing in flight.
    Idle,
    /// Still running, progress unchanged since the previous poll.
    Unchanged,
    /// Still running, progress moved to the given percent.
    Progress(u32),
    /// A result is waiting in [`ComputeController::take_result`].
    ResultReady,
    /// The computation ended but its result was stale, cancelled or failed.
    Discarded,
}

/// A finished computation that matched the current window.
#[derive(Debug)]
pub struct CompletedCompute {
    pub params: ComputeParams,
    pub grid: IterationGrid,
    pub elapsed: Duration,
}

/// Runs at most one background computation and hands its result to the UI.
///
/// Requests made while a computation is pending are coalesced into a single
/// deferred flag, which the owner checks with
/// [`take_deferred`](Self::take_deferred) once the controller is idle again.
#[derive(Debug, Default)]
pub struct ComputeController {
    task: Option<ComputeHandle>,
    ready: Option<CompletedCompute>,
    spare: Option<IterationGrid>,
    deferred: bool,
    last_progress: Option<u32>,
}

impl ComputeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ControllerPhase {
        if self.task.is_some() {
            ControllerPhase::PendingCompute
        } else if self.ready.is_some() {
            ControllerPhase::ResultReady
        } else {
            ControllerPhase::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    /// Latest progress of the computation in flight.
    pub fn progress(&self) -> Option<u32> {
        self.task.as_ref().map(|t| t.progress())
    }

    /// Dispatch `params`, or defer it if the controller is busy.
    ///
    /// Returns `Ok(true)` when a computation was started and `Ok(false)` when
    /// the request was folded into the deferred flag.
    pub fn request(&mut self, params: ComputeParams) -> crate::Result<bool> {
        if self.phase() != ControllerPhase::Idle {
            if !self.deferred {
                debug!("Computation busy, deferring request");
            }
            self.deferred = true;
            return Ok(false);
        }
        params.validate()?;

        let grid = IterationGrid::reuse_or_new(
            self.spare.take(),
            params.width,
            params.height,
            params.max_iteration,
        );
        let handle = ComputeHandle::spawn(params, grid).map_err(|e| {
            error!("Failed to start computation: {e}");
            e
        })?;
        debug!(
            width = params.width,
            height = params.height,
            max_iteration = params.max_iteration,
            precision = params.precision.label(),
            view = %params.view,
            "Dispatched computation"
        );
        self.task = Some(handle);
        self.last_progress = None;
        Ok(true)
    }

    /// Check the computation in flight. Call once per UI frame.
    ///
    /// A result whose size differs from `width`×`height`, or whose computation
    /// was cancelled, is dropped and the controller returns to idle.
    pub fn poll(&mut self, width: u32, height: u32) -> PollOutcome {
        let Some(task) = self.task.as_mut() else {
            return if self.ready.is_some() {
                PollOutcome::ResultReady
            } else {
                PollOutcome::Idle
            };
        };

        if let Some(output) = task.try_take() {
            let cancelled = task.is_cancelled();
            self.task = None;
            return match output.result {
                Ok(grid) if !cancelled && grid.width == width && grid.height == height => {
                    info!(
                        elapsed_ms = output.elapsed.as_millis(),
                        actual_max = grid.actual_max,
                        "Computation ready"
                    );
                    self.ready = Some(CompletedCompute {
                        params: output.params,
                        grid,
                        elapsed: output.elapsed,
                    });
                    PollOutcome::ResultReady
                }
                Ok(grid) => {
                    warn!(
                        computed_width = grid.width,
                        computed_height = grid.height,
                        width,
                        height,
                        cancelled,
                        "Discarding stale computation"
                    );
                    self.spare = Some(grid);
                    PollOutcome::Discarded
                }
                Err(RenderError::Cancelled) => {
                    debug!("Cancelled computation drained");
                    PollOutcome::Discarded
                }
                Err(e) => {
                    error!("Computation failed: {e}");
                    PollOutcome::Discarded
                }
            };
        }

        if task.is_lost() {
            error!("Compute thread exited without a result");
            self.task = None;
            return PollOutcome::Discarded;
        }

        let percent = task.progress();
        if self.last_progress != Some(percent) {
            self.last_progress = Some(percent);
            PollOutcome::Progress(percent)
        } else {
            PollOutcome::Unchanged
        }
    }

    /// Hand out the ready result, returning the controller to idle.
    pub fn take_result(&mut self) -> Option<CompletedCompute> {
        self.ready.take()
    }

    /// Ask the computation in flight to stop at the next row.
    pub fn cancel(&mut self) {
        if let Some(task) = &self.task {
            debug!("Cancelling computation");
            task.cancel();
        }
    }

    /// Give back a grid that is no longer displayed so the next computation
    /// can reuse its allocation.
    pub fn recycle(&mut self, grid: IterationGrid) {
        self.spare = Some(grid);
    }

    /// Whether a request arrived while busy. Clears the flag.
    pub fn take_deferred(&mut self) -> bool {
        std::mem::take(&mut self.deferred)
    }
}
