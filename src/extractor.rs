//! Filmstrip decomposition.
//!
//! A filmstrip is a single image whose frames are stacked top to bottom.
//! [`FrameLayout`] derives the shared frame height from the source height and
//! the requested frame count, and [`FrameExtractor`] copies each horizontal
//! band into its own [`PixelSurface`].
//!
//! When the height does not divide evenly, the leftover rows at the bottom are
//! never assigned to any frame. Under [`RemainderPolicy::Discard`] this is
//! reported as a [`DimensionWarning`]; under [`RemainderPolicy::Reject`] it is
//! an error.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroU32;
//!
//! use filmstrip::{FrameExtractor, PixelSurface, RemainderPolicy};
//!
//! let source = PixelSurface::zeroed(16, 64)?;
//! let frame_count = NonZeroU32::new(4).unwrap();
//! let extractor = FrameExtractor::new(&source, frame_count, RemainderPolicy::Discard)?;
//!
//! for frame in extractor.frames() {
//!     let frame = frame?;
//!     assert_eq!(frame.surface.height(), 16);
//! }
//! # Ok::<(), filmstrip::FilmstripError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroU32;

use crate::error::FilmstripError;
use crate::surface::PixelSurface;

/// What to do with rows left over when the height is not divisible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainderPolicy {
    /// Drop the bottom rows and report a [`DimensionWarning`]. This is the default.
    #[default]
    Discard,
    /// Fail with [`FilmstripError::UnevenFrameHeight`].
    Reject,
}

/// Non-fatal notice that bottom rows of the source were excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionWarning {
    /// Height of the source surface.
    pub source_height: u32,
    /// Requested number of frames.
    pub frame_count: u32,
    /// Height shared by every frame.
    pub frame_height: u32,
    /// Rows at the bottom of the source that no frame covers.
    pub discarded_rows: u32,
}

impl Display for DimensionWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "image height {} is not evenly divisible by frame count {}; \
             using frame height {} and discarding the last {} row(s)",
            self.source_height, self.frame_count, self.frame_height, self.discarded_rows
        )
    }
}

/// Frame geometry derived once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Number of frames.
    pub frame_count: u32,
    /// Width of every frame (equal to the source width).
    pub frame_width: u32,
    /// `floor(source_height / frame_count)`.
    pub frame_height: u32,
    /// `source_height % frame_count`.
    pub remainder_rows: u32,
}

impl FrameLayout {
    /// Derive the layout for a `width` x `height` source split into `frame_count` bands.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::FrameCountExceedsHeight`] if the frames would
    /// be zero rows tall, or [`FilmstripError::UnevenFrameHeight`] when
    /// `policy` is [`RemainderPolicy::Reject`] and rows would be left over.
    pub fn new(
        width: u32,
        height: u32,
        frame_count: NonZeroU32,
        policy: RemainderPolicy,
    ) -> Result<Self, FilmstripError> {
        let frame_count = frame_count.get();
        let frame_height = height / frame_count;
        let remainder_rows = height % frame_count;

        if frame_height == 0 {
            return Err(FilmstripError::FrameCountExceedsHeight {
                frame_count,
                height,
            });
        }

        if remainder_rows != 0 && policy == RemainderPolicy::Reject {
            return Err(FilmstripError::UnevenFrameHeight {
                height,
                frame_count,
                remainder: remainder_rows,
            });
        }

        Ok(Self {
            frame_count,
            frame_width: width,
            frame_height,
            remainder_rows,
        })
    }

    /// Total source height the layout was derived from.
    pub fn source_height(&self) -> u32 {
        self.frame_height * self.frame_count + self.remainder_rows
    }

    /// The warning to surface, if any rows are discarded.
    pub fn warning(&self) -> Option<DimensionWarning> {
        (self.remainder_rows != 0).then_some(DimensionWarning {
            source_height: self.source_height(),
            frame_count: self.frame_count,
            frame_height: self.frame_height,
            discarded_rows: self.remainder_rows,
        })
    }

    /// First source row of frame `index`.
    pub fn band_start(&self, index: u32) -> u32 {
        index * self.frame_height
    }
}

/// One extracted band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 0-based position from the top of the filmstrip.
    pub index: u32,
    /// The copied pixels, `frame_width` x `frame_height`.
    pub surface: PixelSurface,
}

/// Copies horizontal bands out of a borrowed source surface.
///
/// The source is only ever read; every [`Frame`] owns a fresh buffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameExtractor<'a> {
    source: &'a PixelSurface,
    layout: FrameLayout,
}

impl<'a> FrameExtractor<'a> {
    /// Prepare to split `source` into `frame_count` frames.
    ///
    /// # Errors
    ///
    /// Same as [`FrameLayout::new`].
    pub fn new(
        source: &'a PixelSurface,
        frame_count: NonZeroU32,
        policy: RemainderPolicy,
    ) -> Result<Self, FilmstripError> {
        let layout = FrameLayout::new(source.width(), source.height(), frame_count, policy)?;
        if let Some(warning) = layout.warning() {
            log::warn!("{warning}");
        }
        Ok(Self { source, layout })
    }

    /// Pair `source` with a layout already derived from its dimensions.
    pub(crate) fn from_layout(source: &'a PixelSurface, layout: FrameLayout) -> Self {
        debug_assert_eq!(layout.source_height(), source.height());
        Self { source, layout }
    }

    /// The derived layout.
    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Extract frame `index`.
    ///
    /// Row `y` of the frame is row `index * frame_height + y` of the source,
    /// copied byte for byte.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::FrameOutOfRange`] if `index >= frame_count`.
    pub fn extract(&self, index: u32) -> Result<Frame, FilmstripError> {
        if index >= self.layout.frame_count {
            return Err(FilmstripError::FrameOutOfRange {
                index,
                frame_count: self.layout.frame_count,
            });
        }

        let mut surface = PixelSurface::zeroed(self.layout.frame_width, self.layout.frame_height)?;
        let y_start = self.layout.band_start(index);

        for y in 0..self.layout.frame_height {
            // Rows past the source edge stay zero-filled.
            let Some(source_row) = y_start
                .checked_add(y)
                .and_then(|source_y| self.source.row(source_y))
            else {
                log::debug!("Frame {index}: source row {} out of bounds", y_start + y);
                continue;
            };
            if let Some(target_row) = surface.row_mut(y) {
                target_row.copy_from_slice(source_row);
            }
        }

        Ok(Frame { index, surface })
    }

    /// Lazily extract every frame in ascending index order.
    pub fn frames(&self) -> FrameIterator<'a> {
        FrameIterator {
            extractor: *self,
            next_index: 0,
        }
    }

    /// Extract every frame eagerly.
    ///
    /// # Errors
    ///
    /// Propagates the first extraction error.
    pub fn extract_all(&self) -> Result<Vec<Frame>, FilmstripError> {
        self.frames().collect()
    }
}

/// Pull-based iterator over a filmstrip's frames.
///
/// Each call to [`next()`](Iterator::next) copies one band, so only one frame
/// buffer needs to be alive at a time.
pub struct FrameIterator<'a> {
    extractor: FrameExtractor<'a>,
    next_index: u32,
}

impl Iterator for FrameIterator<'_> {
    type Item = Result<Frame, FilmstripError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.extractor.layout.frame_count {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        Some(self.extractor.extract(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.extractor.layout.frame_count - self.next_index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameIterator<'_> {}
