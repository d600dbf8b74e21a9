//! In-memory RGBA pixel surfaces.
//!
//! [`PixelSurface`] is the bitmap every stage of the pipeline exchanges:
//! a width, a height, and a dense row-major buffer with exactly four bytes
//! (R, G, B, A) per pixel.

use image::RgbaImage;

use crate::error::FilmstripError;

/// Bytes occupied by one pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A decoded RGBA bitmap.
///
/// The buffer length always equals `width * height * 4`. Constructors reject
/// buffers that break this rule, and no method hands out the buffer mutably
/// in a way that could change its length.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PixelSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelSurface {
    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::InvalidSurface`] if either dimension is zero
    /// or `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FilmstripError> {
        if width == 0 || height == 0 || byte_len(width, height) != Some(data.len()) {
            return Err(FilmstripError::InvalidSurface {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Allocate a zero-filled (transparent black) surface.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::InvalidSurface`] if either dimension is zero
    /// or the buffer size does not fit in `usize`.
    pub fn zeroed(width: u32, height: u32) -> Result<Self, FilmstripError> {
        let len = byte_len(width, height).ok_or(FilmstripError::InvalidSurface {
            width,
            height,
            len: 0,
        })?;
        Self::from_raw(width, height, vec![0; len])
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in one row.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// The full pixel buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the surface and return its pixel buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of row `y`, or `None` past the bottom edge.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get_mut(start..start + stride)
    }

    /// The RGBA value at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let start = x as usize * BYTES_PER_PIXEL;
        let mut pixel = [0; BYTES_PER_PIXEL];
        pixel.copy_from_slice(&row[start..start + BYTES_PER_PIXEL]);
        Some(pixel)
    }
}

/// `width * height * 4`, or `None` on overflow.
fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
}

impl TryFrom<RgbaImage> for PixelSurface {
    type Error = FilmstripError;

    fn try_from(image: RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        Self::from_raw(width, height, image.into_raw())
    }
}

impl From<PixelSurface> for RgbaImage {
    fn from(surface: PixelSurface) -> Self {
        let PixelSurface {
            width,
            height,
            data,
        } = surface;
        // The length invariant guarantees `from_raw` accepts the buffer.
        RgbaImage::from_raw(width, height, data)
            .unwrap_or_else(|| RgbaImage::new(width, height))
    }
}
