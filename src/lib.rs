//! # filmstrip
//!
//! Split vertically-stacked filmstrip sprite sheets, as produced by knob and
//! slider graphics generators, into one image file per frame.
//!
//! A filmstrip of height `H` holding `N` frames is cut into `N` bands of
//! `floor(H / N)` rows each. Frame 0 is the top band. Every band is copied
//! byte for byte into its own RGBA surface, encoded losslessly, and written
//! as `{prefix}_{index}.{ext}`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::num::NonZeroU32;
//!
//! use filmstrip::{FilmstripSplitter, SplitOptions};
//!
//! let splitter = FilmstripSplitter::new(NonZeroU32::new(64).unwrap(), SplitOptions::new())?;
//! let report = splitter.split_file("knob.png", "frames")?;
//! assert_eq!(report.written.len(), 64);
//! # Ok::<(), filmstrip::FilmstripError>(())
//! ```
//!
//! ### Extract In Memory
//!
//! ```
//! use std::num::NonZeroU32;
//!
//! use filmstrip::{FrameExtractor, PixelSurface, RemainderPolicy};
//!
//! let source = PixelSurface::zeroed(32, 100)?;
//! let extractor = FrameExtractor::new(&source, NonZeroU32::new(3).unwrap(), RemainderPolicy::Discard)?;
//! let layout = extractor.layout();
//! assert_eq!(layout.frame_height, 33);
//! assert!(layout.warning().is_some());
//! # Ok::<(), filmstrip::FilmstripError>(())
//! ```
//!
//! ## Features
//!
//! - **Band extraction**: exact row copies, no resampling or colour conversion
//! - **Remainder handling**: warn and discard leftover rows, or reject them
//! - **Pluggable stages**: [`FrameDecoder`], [`FrameEncoder`], and [`FrameSink`] traits
//! - **Atomic writes**: frames are written to a temporary file and renamed into place
//! - **Progress callbacks**: [`ProgressCallback`] at a configurable cadence
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `split_surface_parallel()` encodes and writes frames on rayon threads |
//! | `full` | Enables all of the above |

pub mod codec;
pub mod configuration;
pub mod error;
pub mod extractor;
pub mod naming;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
pub mod sink;
pub mod splitter;
pub mod surface;

pub use codec::{FrameDecoder, FrameEncoder, ImageCodec, OutputFormat};
pub use configuration::SplitOptions;
pub use error::FilmstripError;
pub use extractor::{
    DimensionWarning, Frame, FrameExtractor, FrameIterator, FrameLayout, RemainderPolicy,
};
pub use naming::{DEFAULT_PREFIX, frame_file_name, frame_path};
pub use progress::{ProgressCallback, ProgressInfo};
pub use sink::{FileSink, FrameSink};
pub use splitter::{
    DEFAULT_FRAME_COUNT, FilmstripSpec, FilmstripSplitter, PreparedSplit, SplitReport,
    parse_frame_count,
};
pub use surface::{BYTES_PER_PIXEL, PixelSurface};
