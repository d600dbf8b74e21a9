//! The split pipeline.
//!
//! [`FilmstripSplitter`] runs decode → extract → encode → persist for every
//! frame, in ascending index order, and returns a [`SplitReport`]. The first
//! failing stage aborts the run; frames written before the failure stay on
//! disk.
//!
//! # Example
//!
//! ```no_run
//! use std::num::NonZeroU32;
//!
//! use filmstrip::{FilmstripSplitter, SplitOptions};
//!
//! let splitter = FilmstripSplitter::new(
//!     NonZeroU32::new(128).unwrap(),
//!     SplitOptions::new().with_prefix("knob"),
//! )?;
//! let report = splitter.split_file("knob_strip.png", "frames")?;
//! if let Some(warning) = report.warning {
//!     eprintln!("warning: {warning}");
//! }
//! println!("wrote {} frames", report.written.len());
//! # Ok::<(), filmstrip::FilmstripError>(())
//! ```

use std::fs;
use std::num::{IntErrorKind, NonZeroU32};
use std::path::{Path, PathBuf};

use crate::codec::{FrameDecoder, FrameEncoder, ImageCodec};
use crate::configuration::SplitOptions;
use crate::error::FilmstripError;
use crate::extractor::{DimensionWarning, Frame, FrameExtractor, FrameLayout};
use crate::naming::frame_path;
use crate::progress::ProgressTracker;
use crate::sink::{FileSink, FrameSink};
use crate::surface::PixelSurface;

/// Frame count used when the caller does not supply one.
pub const DEFAULT_FRAME_COUNT: NonZeroU32 = NonZeroU32::new(128).unwrap();

/// Parse a user-supplied frame count.
///
/// # Errors
///
/// Returns [`FilmstripError::InvalidFrameCount`] for anything that is not a
/// positive integer, including `0` and negative numbers, and
/// [`FilmstripError::FrameCountOutOfRange`] for integers above `u32::MAX`.
pub fn parse_frame_count(value: &str) -> Result<NonZeroU32, FilmstripError> {
    value
        .trim()
        .parse::<NonZeroU32>()
        .map_err(|error| match error.kind() {
            IntErrorKind::PosOverflow => FilmstripError::FrameCountOutOfRange(value.to_string()),
            _ => FilmstripError::InvalidFrameCount(value.to_string()),
        })
}

/// An immutable decomposition request: the source, how many frames to cut,
/// and the file name prefix.
#[derive(Debug, Clone)]
pub struct FilmstripSpec {
    source: PixelSurface,
    frame_count: NonZeroU32,
    prefix: String,
}

impl FilmstripSpec {
    /// Build a request.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::EmptyPrefix`] if `prefix` is empty.
    pub fn new(
        source: PixelSurface,
        frame_count: NonZeroU32,
        prefix: impl Into<String>,
    ) -> Result<Self, FilmstripError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(FilmstripError::EmptyPrefix);
        }
        Ok(Self {
            source,
            frame_count,
            prefix,
        })
    }

    /// The source surface.
    pub fn source(&self) -> &PixelSurface {
        &self.source
    }

    /// Requested number of frames.
    pub fn frame_count(&self) -> NonZeroU32 {
        self.frame_count
    }

    /// File name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Outcome of a completed split.
#[derive(Debug, Clone)]
#[must_use]
pub struct SplitReport {
    /// Number of frames written.
    pub frame_count: u32,
    /// Width of every frame.
    pub frame_width: u32,
    /// Height of every frame.
    pub frame_height: u32,
    /// Rows at the bottom of the source that were not written.
    pub remainder_rows: u32,
    /// Set when rows were discarded.
    pub warning: Option<DimensionWarning>,
    /// Written files, in ascending frame index order.
    pub written: Vec<PathBuf>,
}

impl SplitReport {
    fn new(layout: &FrameLayout, written: Vec<PathBuf>) -> Self {
        Self {
            frame_count: layout.frame_count,
            frame_width: layout.frame_width,
            frame_height: layout.frame_height,
            remainder_rows: layout.remainder_rows,
            warning: layout.warning(),
            written,
        }
    }
}

/// A request whose frame layout has been resolved but not yet written.
///
/// Returned by [`FilmstripSplitter::prepare`] so callers can inspect the
/// layout, and report any [`DimensionWarning`], before a single file exists.
#[derive(Debug, Clone)]
pub struct PreparedSplit {
    spec: FilmstripSpec,
    layout: FrameLayout,
}

impl PreparedSplit {
    /// The underlying request.
    pub fn spec(&self) -> &FilmstripSpec {
        &self.spec
    }

    /// The derived frame layout.
    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Set when rows will be discarded.
    pub fn warning(&self) -> Option<DimensionWarning> {
        self.layout.warning()
    }
}

/// Splits filmstrip images into numbered frame files.
///
/// Generic over the decoder, encoder, and sink so each stage can be replaced;
/// the defaults decode and encode with the `image` crate and write to the
/// filesystem.
#[derive(Debug, Clone)]
pub struct FilmstripSplitter<D = ImageCodec, E = ImageCodec, S = FileSink> {
    frame_count: NonZeroU32,
    options: SplitOptions,
    decoder: D,
    encoder: E,
    sink: S,
}

impl FilmstripSplitter {
    /// Create a splitter using the default codec and filesystem sink.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::EmptyPrefix`] if the configured prefix is empty.
    pub fn new(frame_count: NonZeroU32, options: SplitOptions) -> Result<Self, FilmstripError> {
        if options.prefix.is_empty() {
            return Err(FilmstripError::EmptyPrefix);
        }
        let codec = ImageCodec::new(options.format);
        Ok(Self {
            frame_count,
            options,
            decoder: codec,
            encoder: codec,
            sink: FileSink,
        })
    }
}

impl<D, E, S> FilmstripSplitter<D, E, S> {
    /// Replace the decoder.
    pub fn with_decoder<D2>(self, decoder: D2) -> FilmstripSplitter<D2, E, S> {
        FilmstripSplitter {
            frame_count: self.frame_count,
            options: self.options,
            decoder,
            encoder: self.encoder,
            sink: self.sink,
        }
    }

    /// Replace the encoder.
    pub fn with_encoder<E2>(self, encoder: E2) -> FilmstripSplitter<D, E2, S> {
        FilmstripSplitter {
            frame_count: self.frame_count,
            options: self.options,
            decoder: self.decoder,
            encoder,
            sink: self.sink,
        }
    }

    /// Replace the sink.
    pub fn with_sink<S2>(self, sink: S2) -> FilmstripSplitter<D, E, S2> {
        FilmstripSplitter {
            frame_count: self.frame_count,
            options: self.options,
            decoder: self.decoder,
            encoder: self.encoder,
            sink,
        }
    }

    /// Requested number of frames.
    pub fn frame_count(&self) -> NonZeroU32 {
        self.frame_count
    }

    /// The configured options.
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }
}

impl<D, E, S> FilmstripSplitter<D, E, S>
where
    D: FrameDecoder,
    E: FrameEncoder,
    S: FrameSink,
{
    /// Read and decode the image at `input`.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::FileOpen`] if the file cannot be read and
    /// [`FilmstripError::Decode`] if it is not a valid image.
    pub fn read_source(&self, input: impl AsRef<Path>) -> Result<PixelSurface, FilmstripError> {
        let input = input.as_ref();
        log::debug!("Reading filmstrip from {}", input.display());
        let bytes = fs::read(input).map_err(|error| FilmstripError::FileOpen {
            path: input.to_path_buf(),
            reason: error.to_string(),
        })?;
        self.decoder.decode(&bytes)
    }

    /// Read, decode, and split the image at `input`.
    ///
    /// # Errors
    ///
    /// Anything [`read_source`](FilmstripSplitter::read_source) or
    /// [`split_surface`](FilmstripSplitter::split_surface) returns.
    pub fn split_file(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<SplitReport, FilmstripError> {
        let source = self.read_source(input)?;
        self.split_surface(source, output_dir)
    }

    /// Decode `bytes` and split the result.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::Decode`] for invalid images, plus anything
    /// [`split_surface`](FilmstripSplitter::split_surface) returns.
    pub fn split_bytes(
        &self,
        bytes: &[u8],
        output_dir: impl AsRef<Path>,
    ) -> Result<SplitReport, FilmstripError> {
        let source = self.decoder.decode(bytes)?;
        self.split_surface(source, output_dir)
    }

    /// Split an already-decoded surface.
    ///
    /// # Errors
    ///
    /// Returns argument errors from the layout derivation, and
    /// [`FilmstripError::Encode`] / [`FilmstripError::Persist`] from the
    /// first frame that fails.
    pub fn split_surface(
        &self,
        source: PixelSurface,
        output_dir: impl AsRef<Path>,
    ) -> Result<SplitReport, FilmstripError> {
        let prepared = self.prepare(source)?;
        self.write(&prepared, output_dir)
    }

    /// Resolve the frame layout for `source` without touching the sink.
    ///
    /// Logs the remainder warning, if any.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::FrameCountExceedsHeight`], or
    /// [`FilmstripError::UnevenFrameHeight`] under
    /// [`RemainderPolicy::Reject`](crate::RemainderPolicy::Reject).
    pub fn prepare(&self, source: PixelSurface) -> Result<PreparedSplit, FilmstripError> {
        let spec = FilmstripSpec::new(source, self.frame_count, self.options.prefix.clone())?;
        let layout = FrameLayout::new(
            spec.source().width(),
            spec.source().height(),
            spec.frame_count(),
            self.options.remainder_policy,
        )?;
        if let Some(warning) = layout.warning() {
            log::warn!("{warning}");
        }
        Ok(PreparedSplit { spec, layout })
    }

    /// Write every frame of a prepared request.
    ///
    /// # Errors
    ///
    /// Returns [`FilmstripError::Encode`] / [`FilmstripError::Persist`] from
    /// the first frame that fails.
    pub fn write(
        &self,
        prepared: &PreparedSplit,
        output_dir: impl AsRef<Path>,
    ) -> Result<SplitReport, FilmstripError> {
        let output_dir = output_dir.as_ref();
        let (spec, layout) = (&prepared.spec, prepared.layout);
        let extractor = FrameExtractor::from_layout(spec.source(), layout);
        log::debug!(
            "Splitting {}x{} into {} frames of {}x{}",
            spec.source().width(),
            spec.source().height(),
            layout.frame_count,
            layout.frame_width,
            layout.frame_height
        );

        self.sink.ensure_dir(output_dir)?;

        let tracker = ProgressTracker::new(
            self.options.progress.clone(),
            u64::from(layout.frame_count),
            self.options.batch_size,
        );

        let mut written = Vec::with_capacity(layout.frame_count as usize);
        for frame in extractor.frames() {
            let frame = frame?;
            let index = frame.index;
            written.push(write_frame(
                &self.encoder,
                &self.sink,
                frame,
                output_dir,
                spec.prefix(),
            )?);
            tracker.advance(index);
        }
        tracker.finish();

        log::info!(
            "Wrote {} frames to {}",
            written.len(),
            output_dir.display()
        );
        Ok(SplitReport::new(&layout, written))
    }
}

/// Encode and persist one frame, consuming it.
fn write_frame<E: FrameEncoder, S: FrameSink>(
    encoder: &E,
    sink: &S,
    frame: Frame,
    output_dir: &Path,
    prefix: &str,
) -> Result<PathBuf, FilmstripError> {
    let bytes = encoder.encode(&frame.surface, frame.index)?;
    let path = frame_path(output_dir, prefix, frame.index, encoder.extension());
    sink.persist(&path, &bytes)?;
    Ok(path)
}

#[cfg(feature = "rayon")]
impl<D, E, S> FilmstripSplitter<D, E, S>
where
    D: FrameDecoder,
    E: FrameEncoder + Sync,
    S: FrameSink,
{
    /// Like [`split_surface`](FilmstripSplitter::split_surface), but extracts,
    /// encodes, and persists frames on the rayon thread pool.
    ///
    /// The files produced are identical to the sequential run. Progress
    /// reports and file creation may happen in any order; the report's
    /// `written` list is still in index order.
    ///
    /// # Errors
    ///
    /// Same as [`split_surface`](FilmstripSplitter::split_surface). Frames
    /// other than the failing one may or may not have been written.
    pub fn split_surface_parallel(
        &self,
        source: PixelSurface,
        output_dir: impl AsRef<Path>,
    ) -> Result<SplitReport, FilmstripError> {
        let output_dir = output_dir.as_ref();
        let prepared = self.prepare(source)?;
        let (spec, layout) = (&prepared.spec, prepared.layout);
        let extractor = FrameExtractor::from_layout(spec.source(), layout);

        self.sink.ensure_dir(output_dir)?;

        let tracker = ProgressTracker::new(
            self.options.progress.clone(),
            u64::from(layout.frame_count),
            self.options.batch_size,
        );
        let (encoder, sink, prefix) = (&self.encoder, &self.sink, spec.prefix());
        let written = crate::rayon::parallel_write_frames(&extractor, &tracker, |frame| {
            write_frame(encoder, sink, frame, output_dir, prefix)
        })?;
        tracker.finish();

        log::info!(
            "Wrote {} frames to {} (parallel)",
            written.len(),
            output_dir.display()
        );
        Ok(SplitReport::new(&layout, written))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn parse_frame_count_accepts_positive() {
        assert_eq!(parse_frame_count("4").unwrap().get(), 4);
        assert_eq!(parse_frame_count(" 128 ").unwrap().get(), 128);
    }

    #[test]
    fn parse_frame_count_rejects_invalid() {
        for value in ["0", "-1", "-128", "abc", "", "1.5"] {
            assert!(
                matches!(
                    parse_frame_count(value),
                    Err(FilmstripError::InvalidFrameCount(_))
                ),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_frame_count_reports_overflow_as_out_of_range() {
        let error = parse_frame_count("4294967296").unwrap_err();
        assert!(matches!(error, FilmstripError::FrameCountOutOfRange(ref value) if value == "4294967296"));
        assert!(error.to_string().contains("out of range"));
        assert_eq!(parse_frame_count("4294967295").unwrap().get(), u32::MAX);
    }

    #[test]
    fn default_frame_count_is_128() {
        assert_eq!(DEFAULT_FRAME_COUNT.get(), 128);
    }

    #[test]
    fn spec_rejects_empty_prefix() {
        let source = PixelSurface::zeroed(1, 1).unwrap();
        let result = FilmstripSpec::new(source, NonZeroU32::MIN, "");
        assert!(matches!(result, Err(FilmstripError::EmptyPrefix)));
    }

    #[test]
    fn splitter_rejects_empty_prefix() {
        let result = FilmstripSplitter::new(NonZeroU32::MIN, SplitOptions::new().with_prefix(""));
        assert!(matches!(result, Err(FilmstripError::EmptyPrefix)));
    }

    /// Records persisted paths in memory.
    #[derive(Default)]
    struct MemorySink {
        dirs: Mutex<Vec<PathBuf>>,
        files: Mutex<Vec<(PathBuf, usize)>>,
    }

    impl FrameSink for MemorySink {
        fn ensure_dir(&self, dir: &Path) -> Result<(), FilmstripError> {
            self.dirs.lock().unwrap().push(dir.to_path_buf());
            Ok(())
        }

        fn persist(&self, path: &Path, bytes: &[u8]) -> Result<(), FilmstripError> {
            self.files
                .lock()
                .unwrap()
                .push((path.to_path_buf(), bytes.len()));
            Ok(())
        }
    }

    #[test]
    fn run_ensures_dir_once_before_frames() {
        let splitter = FilmstripSplitter::new(NonZeroU32::new(3).unwrap(), SplitOptions::new())
            .unwrap()
            .with_sink(MemorySink::default());
        let source = PixelSurface::zeroed(2, 6).unwrap();

        assert_eq!(splitter.frame_count().get(), 3);
        assert_eq!(splitter.options().prefix(), "frame");

        let report = splitter.split_surface(source, "out").unwrap();
        assert_eq!(report.frame_height, 2);

        let sink = &splitter.sink;
        assert_eq!(sink.dirs.lock().unwrap().as_slice(), &[PathBuf::from("out")]);
        let names: Vec<PathBuf> = sink
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                Path::new("out").join("frame_0.png"),
                Path::new("out").join("frame_1.png"),
                Path::new("out").join("frame_2.png"),
            ]
        );
        assert_eq!(report.written, names);
    }

    #[test]
    fn prepare_resolves_layout_without_touching_the_sink() {
        let splitter = FilmstripSplitter::new(NonZeroU32::new(3).unwrap(), SplitOptions::new())
            .unwrap()
            .with_sink(MemorySink::default());
        let source = PixelSurface::zeroed(2, 7).unwrap();

        let prepared = splitter.prepare(source).unwrap();
        assert_eq!(prepared.layout().frame_height, 2);
        assert_eq!(prepared.warning().map(|warning| warning.discarded_rows), Some(1));
        assert_eq!(prepared.spec().prefix(), "frame");
        assert!(splitter.sink.dirs.lock().unwrap().is_empty());
        assert!(splitter.sink.files.lock().unwrap().is_empty());

        let report = splitter.write(&prepared, "out").unwrap();
        assert_eq!(report.written.len(), 3);
        assert_eq!(report.warning, prepared.warning());
        assert_eq!(splitter.sink.dirs.lock().unwrap().len(), 1);
    }

    #[test]
    fn prepare_rejects_before_any_write() {
        let splitter = FilmstripSplitter::new(NonZeroU32::new(9).unwrap(), SplitOptions::new())
            .unwrap()
            .with_sink(MemorySink::default());
        let result = splitter.prepare(PixelSurface::zeroed(1, 4).unwrap());
        assert!(matches!(
            result,
            Err(FilmstripError::FrameCountExceedsHeight { .. })
        ));
        assert!(splitter.sink.dirs.lock().unwrap().is_empty());
    }

    struct FailingEncoder {
        fail_at: u32,
    }

    impl FrameEncoder for FailingEncoder {
        fn encode(&self, _surface: &PixelSurface, index: u32) -> Result<Vec<u8>, FilmstripError> {
            if index == self.fail_at {
                return Err(FilmstripError::Encode {
                    index,
                    reason: "synthetic failure".into(),
                });
            }
            Ok(vec![index as u8])
        }

        fn extension(&self) -> &str {
            "bin"
        }
    }

    #[test]
    fn encode_failure_aborts_remaining_frames() {
        let splitter = FilmstripSplitter::new(NonZeroU32::new(4).unwrap(), SplitOptions::new())
            .unwrap()
            .with_encoder(FailingEncoder { fail_at: 2 })
            .with_sink(MemorySink::default());
        let source = PixelSurface::zeroed(1, 8).unwrap();

        let result = splitter.split_surface(source, "out");
        assert!(matches!(result, Err(FilmstripError::Encode { index: 2, .. })));
        // Frames before the failure were persisted; none after.
        assert_eq!(splitter.sink.files.lock().unwrap().len(), 2);
    }
}
