//! Error types for the `filmstrip` crate.
//!
//! This module defines [`FilmstripError`], the unified error type returned by
//! every fallible operation in the crate. Variants carry enough context (paths,
//! frame indices, dimensions) to produce a useful diagnostic without extra
//! logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `filmstrip` operations.
///
/// Argument, decode, encode, and persist failures are all fatal to a split
/// run. The non-fatal remainder condition is reported through
/// [`DimensionWarning`](crate::DimensionWarning) instead, unless the strict
/// [`RemainderPolicy::Reject`](crate::RemainderPolicy::Reject) is selected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FilmstripError {
    /// The frame count was missing a valid positive integer value.
    #[error("Invalid frame count: {0} (must be a positive integer)")]
    InvalidFrameCount(String),

    /// The frame count was a positive integer too large to represent.
    #[error("Frame count {0} is out of range (maximum {max})", max = u32::MAX)]
    FrameCountOutOfRange(String),

    /// The file name prefix was empty.
    #[error("Frame name prefix must not be empty")]
    EmptyPrefix,

    /// More frames were requested than the source has rows.
    #[error("Frame count {frame_count} exceeds source height {height}")]
    FrameCountExceedsHeight {
        /// Requested number of frames.
        frame_count: u32,
        /// Height of the source surface in rows.
        height: u32,
    },

    /// The source height does not divide evenly and the strict policy is active.
    #[error(
        "Source height {height} is not divisible by frame count {frame_count} ({remainder} rows left over)"
    )]
    UnevenFrameHeight {
        /// Height of the source surface in rows.
        height: u32,
        /// Requested number of frames.
        frame_count: u32,
        /// Rows that would have been discarded.
        remainder: u32,
    },

    /// The input image could not be read from disk.
    #[error("Failed to open input image at {path}: {reason}")]
    FileOpen {
        /// Path that was passed in.
        path: PathBuf,
        /// Underlying reason the read failed.
        reason: String,
    },

    /// The input bytes are not a recognised or valid image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// A pixel buffer did not match `width * height * 4`.
    #[error("Invalid surface: {width}x{height} requires {} bytes, got {len}", surface_len(.width, .height))]
    InvalidSurface {
        /// Surface width in pixels.
        width: u32,
        /// Surface height in pixels.
        height: u32,
        /// Length of the supplied byte buffer.
        len: usize,
    },

    /// A frame could not be serialised.
    #[error("Failed to encode frame {index}: {reason}")]
    Encode {
        /// Index of the frame being encoded.
        index: u32,
        /// Upstream encoder message.
        reason: String,
    },

    /// A frame could not be written to disk.
    #[error("Failed to write {path}: {source}")]
    Persist {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: IoError,
    },

    /// The requested frame index is outside `0..frame_count`.
    #[error("Frame {index} is out of range (filmstrip has {frame_count} frames)")]
    FrameOutOfRange {
        /// The index that was requested.
        index: u32,
        /// Total frames in the layout.
        frame_count: u32,
    },
}

impl FilmstripError {
    /// Wrap an [`ImageError`] raised while encoding frame `index`.
    pub(crate) fn encode(index: u32, error: ImageError) -> Self {
        FilmstripError::Encode {
            index,
            reason: error.to_string(),
        }
    }

    /// Wrap an [`IoError`] raised while persisting `path`.
    pub(crate) fn persist(path: impl Into<PathBuf>, source: IoError) -> Self {
        FilmstripError::Persist {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by caller-supplied arguments.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            FilmstripError::InvalidFrameCount(_)
                | FilmstripError::FrameCountOutOfRange(_)
                | FilmstripError::EmptyPrefix
                | FilmstripError::FrameCountExceedsHeight { .. }
                | FilmstripError::UnevenFrameHeight { .. }
        )
    }
}

fn surface_len(width: &u32, height: &u32) -> u128 {
    u128::from(*width) * u128::from(*height) * 4
}
