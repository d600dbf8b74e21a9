//! Image decoding and encoding.
//!
//! The splitter talks to image formats through two small traits,
//! [`FrameDecoder`] and [`FrameEncoder`], so tests and embedders can swap in
//! their own codecs. [`ImageCodec`] is the default implementation, backed by
//! the [`image`] crate.
//!
//! # Example
//!
//! ```
//! use filmstrip::{FrameDecoder, FrameEncoder, ImageCodec, OutputFormat, PixelSurface};
//!
//! let surface = PixelSurface::from_raw(1, 2, vec![255, 0, 0, 255, 0, 0, 255, 255])?;
//! let codec = ImageCodec::new(OutputFormat::Png);
//!
//! let bytes = codec.encode(&surface, 0)?;
//! let decoded = codec.decode(&bytes)?;
//! assert_eq!(decoded, surface);
//! # Ok::<(), filmstrip::FilmstripError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Cursor;
use std::str::FromStr;

use image::{ImageFormat, RgbaImage};

use crate::error::FilmstripError;
use crate::surface::PixelSurface;

/// Turns raw bytes into a [`PixelSurface`].
pub trait FrameDecoder {
    /// Decode `bytes` into an RGBA surface.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::Decode`] if the bytes are not a valid image.
    fn decode(&self, bytes: &[u8]) -> Result<PixelSurface, FilmstripError>;
}

/// Serialises a [`PixelSurface`] into a transportable byte buffer.
///
/// Implementations must be deterministic: identical surfaces encode to
/// identical bytes.
pub trait FrameEncoder {
    /// Encode frame `index`.
    ///
    /// The index is only used for error context.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::Encode`] on serialisation failure.
    fn encode(&self, surface: &PixelSurface, index: u32) -> Result<Vec<u8>, FilmstripError>;

    /// File extension (without the dot) matching the encoded format.
    fn extension(&self) -> &str;
}

/// Lossless raster formats that can carry an alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Portable Network Graphics. This is the default.
    #[default]
    Png,
    /// Windows bitmap.
    Bmp,
    /// Tagged Image File Format.
    Tiff,
    /// Truevision TGA.
    Tga,
}

impl OutputFormat {
    /// The file extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Tga => "tga",
        }
    }

    pub(crate) fn to_image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::Tga => ImageFormat::Tga,
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            "tga" => Ok(OutputFormat::Tga),
            other => Err(format!("unsupported output format: {other} (png, bmp, tiff, tga)")),
        }
    }
}

/// [`image`]-backed codec.
///
/// Decoding sniffs the format from the content, so any format the `image`
/// crate was built with is accepted as input. Encoding always writes
/// [`OutputFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec {
    format: OutputFormat,
}

impl ImageCodec {
    /// Create a codec that encodes to `format`.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// The output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl FrameDecoder for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelSurface, FilmstripError> {
        let image = image::load_from_memory(bytes)
            .map_err(|error| FilmstripError::Decode(error.to_string()))?;
        log::debug!(
            "Decoded {}x{} image ({:?})",
            image.width(),
            image.height(),
            image.color()
        );
        PixelSurface::try_from(image.into_rgba8())
    }
}

impl FrameEncoder for ImageCodec {
    fn encode(&self, surface: &PixelSurface, index: u32) -> Result<Vec<u8>, FilmstripError> {
        let image = RgbaImage::from_raw(
            surface.width(),
            surface.height(),
            surface.as_bytes().to_vec(),
        )
        .ok_or_else(|| FilmstripError::Encode {
            index,
            reason: format!(
                "buffer does not fit {}x{}",
                surface.width(),
                surface.height()
            ),
        })?;

        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, self.format.to_image_format())
            .map_err(|error| FilmstripError::encode(index, error))?;
        Ok(buffer.into_inner())
    }

    fn extension(&self) -> &str {
        self.format.extension()
    }
}
