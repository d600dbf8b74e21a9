//! Progress reporting.
//!
//! This module provides [`ProgressCallback`] for monitoring a split run and
//! [`ProgressInfo`] for the snapshots it receives.
//!
//! # Example
//!
//! ```no_run
//! use std::num::NonZeroU32;
//! use std::sync::Arc;
//!
//! use filmstrip::{FilmstripSplitter, ProgressCallback, ProgressInfo, SplitOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("{pct:.1}% complete");
//!         }
//!     }
//! }
//!
//! let options = SplitOptions::new()
//!     .with_progress(Arc::new(PrintProgress))
//!     .with_batch_size(16);
//! let splitter = FilmstripSplitter::new(NonZeroU32::new(128).unwrap(), options)?;
//! splitter.split_file("knob.png", "frames")?;
//! # Ok::<(), filmstrip::FilmstripError>(())
//! ```

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A snapshot of split progress.
///
/// Delivered to [`ProgressCallback::on_progress`] every
/// [`batch_size`](crate::SplitOptions::with_batch_size) frames, plus once
/// when the run finishes.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Frames written so far.
    pub current: u64,
    /// Total frames in the run.
    pub total: u64,
    /// Completion percentage (0.0 – 100.0).
    pub percentage: Option<f32>,
    /// Wall-clock time since the first frame started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Index of the frame that was just written.
    pub current_frame: Option<u32>,
}

/// Trait for receiving progress updates.
///
/// Implementations must be [`Send`] and [`Sync`] because callbacks may be
/// invoked from rayon workers.
///
/// Progress callbacks are **infallible**: they observe but cannot halt the run.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals during a split.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default when none is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

struct TrackerState {
    current: u64,
    items_since_last_report: u64,
}

/// Tracks timing and emits callbacks.
///
/// Uses interior mutability so parallel workers can share one tracker.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    batch_size: u64,
    start_time: Instant,
    state: Mutex<TrackerState>,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64, batch_size: u64) -> Self {
        Self {
            callback,
            total,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            state: Mutex::new(TrackerState {
                current: 0,
                items_since_last_report: 0,
            }),
        }
    }

    /// Record one written frame and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn advance(&self, frame_index: u32) {
        let report = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            state.current += 1;
            state.items_since_last_report += 1;
            if state.items_since_last_report >= self.batch_size {
                state.items_since_last_report = 0;
                Some(state.current)
            } else {
                None
            }
        };

        if let Some(current) = report {
            self.report(current, Some(frame_index));
        }
    }

    /// Unconditionally emit a final progress report.
    pub(crate) fn finish(&self) {
        let current = self.state.lock().map(|state| state.current).unwrap_or(0);
        self.report(current, None);
    }

    fn report(&self, current: u64, frame_index: Option<u32>) {
        let elapsed = self.start_time.elapsed();

        let percentage =
            (self.total > 0).then(|| (current as f32 / self.total as f32) * 100.0);

        let estimated_remaining = (current > 0).then(|| {
            let remaining = self.total.saturating_sub(current);
            let per_item = elapsed / current as u32;
            per_item * remaining as u32
        });

        let info = ProgressInfo {
            current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame_index,
        };

        self.callback.on_progress(&info);
    }
}
