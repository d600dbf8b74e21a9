//! Parallel frame writing.
//!
//! This module provides [`parallel_write_frames`], which extracts, encodes,
//! and persists frames across rayon threads. Frames share only the read-only
//! source surface, so there is no shared mutable state beyond the progress
//! tracker.
//!
//! The public API is exposed through
//! [`FilmstripSplitter::split_surface_parallel`](crate::FilmstripSplitter) —
//! this module contains only the internal implementation.

use std::path::PathBuf;

use ::rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::FilmstripError;
use crate::extractor::{Frame, FrameExtractor};
use crate::progress::ProgressTracker;

/// Extract every frame on the rayon pool and hand each to `write`.
///
/// Returns the written paths in frame-index order.
pub(crate) fn parallel_write_frames<F>(
    extractor: &FrameExtractor<'_>,
    tracker: &ProgressTracker,
    write: F,
) -> Result<Vec<PathBuf>, FilmstripError>
where
    F: Fn(Frame) -> Result<PathBuf, FilmstripError> + Sync,
{
    let frame_count = extractor.layout().frame_count;
    log::debug!("Writing {frame_count} frames on {} threads", ::rayon::current_num_threads());

    // Indexed parallel iterators collect in input order.
    (0..frame_count)
        .into_par_iter()
        .map(|index| {
            let frame = extractor.extract(index)?;
            let path = write(frame)?;
            tracker.advance(index);
            Ok(path)
        })
        .collect()
}
