//! Band extraction tests.
//!
//! Sources are synthesised in memory, so no fixture files are needed.

use std::num::NonZeroU32;

use filmstrip::{FilmstripError, FrameExtractor, PixelSurface, RemainderPolicy};
use image::{Rgba, RgbaImage};

fn count(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).expect("non-zero frame count")
}

/// Four-colour palette, one colour per band.
const BAND_COLOURS: [[u8; 4]; 4] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 128],
    [255, 255, 0, 0],
];

fn banded(width: u32, height: u32, band_height: u32) -> PixelSurface {
    let image = RgbaImage::from_fn(width, height, |_, y| {
        let band = ((y / band_height) as usize).min(BAND_COLOURS.len() - 1);
        Rgba(BAND_COLOURS[band])
    });
    PixelSurface::try_from(image).expect("valid surface")
}

/// Every row gets a colour unique to its index.
fn uniquely_coloured_rows(width: u32, height: u32) -> PixelSurface {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(y & 0xff) as u8, (y >> 8) as u8, (x & 0xff) as u8, 255])
    });
    PixelSurface::try_from(image).expect("valid surface")
}

// ── Scenario A: even division ─────────────────────────────────────

#[test]
fn solid_bands_split_into_solid_frames() {
    let source = banded(100, 400, 100);
    let extractor =
        FrameExtractor::new(&source, count(4), RemainderPolicy::Discard).expect("layout");
    let frames = extractor.extract_all().expect("extract");

    assert_eq!(frames.len(), 4);
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.index as usize, index);
        assert_eq!(frame.surface.width(), 100);
        assert_eq!(frame.surface.height(), 100);
        for pixel in frame.surface.as_bytes().chunks_exact(4) {
            assert_eq!(pixel, BAND_COLOURS[index]);
        }
    }
}

#[test]
fn even_division_heights_sum_to_source_height() {
    for (height, frames) in [(400, 4), (128, 128), (60, 12), (7, 1)] {
        let source = uniquely_coloured_rows(3, height);
        let extractor =
            FrameExtractor::new(&source, count(frames), RemainderPolicy::Discard).unwrap();
        let total: u32 = extractor
            .frames()
            .map(|frame| frame.unwrap().surface.height())
            .sum();

        assert_eq!(total, height);
        assert_eq!(extractor.layout().frame_height, height / frames);
        assert!(extractor.layout().warning().is_none());
    }
}

// ── Scenario B: uneven division ───────────────────────────────────

#[test]
fn uneven_division_discards_bottom_rows_and_warns() {
    let source = uniquely_coloured_rows(100, 401);
    let extractor = FrameExtractor::new(&source, count(4), RemainderPolicy::Discard).unwrap();
    let layout = *extractor.layout();

    assert_eq!(layout.frame_height, 100);
    let warning = layout.warning().expect("warning for 401 / 4");
    assert_eq!(warning.discarded_rows, 1);

    let frames = extractor.extract_all().unwrap();
    let total: u32 = frames.iter().map(|frame| frame.surface.height()).sum();
    assert_eq!(total, 4 * (401 / 4));
    assert!(total < 401);

    // Row 400 never appears in any frame.
    let last_row = source.row(400).unwrap();
    for frame in &frames {
        for y in 0..frame.surface.height() {
            assert_ne!(frame.surface.row(y).unwrap(), last_row);
        }
    }
}

#[test]
fn uneven_division_rejected_under_strict_policy() {
    let source = uniquely_coloured_rows(10, 401);
    let result = FrameExtractor::new(&source, count(4), RemainderPolicy::Reject);
    assert!(matches!(
        result,
        Err(FilmstripError::UnevenFrameHeight {
            height: 401,
            frame_count: 4,
            remainder: 1,
        })
    ));
}

// ── Pixel fidelity ────────────────────────────────────────────────

#[test]
fn every_pixel_maps_to_its_source_band() {
    let source = uniquely_coloured_rows(7, 300);
    let extractor = FrameExtractor::new(&source, count(7), RemainderPolicy::Discard).unwrap();
    let frame_height = extractor.layout().frame_height;
    assert_eq!(frame_height, 42);

    for frame in extractor.frames() {
        let frame = frame.unwrap();
        for y in 0..frame_height {
            for x in 0..7 {
                assert_eq!(
                    frame.surface.pixel(x, y),
                    source.pixel(x, frame.index * frame_height + y),
                    "frame {} pixel ({x}, {y})",
                    frame.index
                );
            }
        }
    }
}

#[test]
fn extraction_leaves_source_untouched() {
    let source = uniquely_coloured_rows(4, 16);
    let snapshot = source.clone();
    let extractor = FrameExtractor::new(&source, count(4), RemainderPolicy::Discard).unwrap();
    let _ = extractor.extract_all().unwrap();
    assert_eq!(source, snapshot);
}

#[test]
fn frames_are_independent_buffers() {
    let source = uniquely_coloured_rows(2, 4);
    let extractor = FrameExtractor::new(&source, count(2), RemainderPolicy::Discard).unwrap();
    let first = extractor.extract(0).unwrap();
    let again = extractor.extract(0).unwrap();
    assert_eq!(first, again);
    assert_ne!(first.surface.as_bytes().as_ptr(), again.surface.as_bytes().as_ptr());
}

#[test]
fn more_frames_than_rows_is_an_error() {
    let source = uniquely_coloured_rows(4, 10);
    let result = FrameExtractor::new(&source, count(11), RemainderPolicy::Discard);
    assert!(matches!(
        result,
        Err(FilmstripError::FrameCountExceedsHeight {
            frame_count: 11,
            height: 10,
        })
    ));
}
