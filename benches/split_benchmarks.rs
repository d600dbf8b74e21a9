//! Benchmarks for band extraction and full splits.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features

use std::num::NonZeroU32;

use criterion::Criterion;
use filmstrip::{
    FilmstripSplitter, FrameEncoder, FrameExtractor, ImageCodec, PixelSurface, RemainderPolicy,
    SplitOptions,
};
use image::{Rgba, RgbaImage};

/// A 128-frame, 64x64 knob strip.
fn knob_strip() -> PixelSurface {
    let image = RgbaImage::from_fn(64, 64 * 128, |x, y| {
        Rgba([(x * 4) as u8, (y % 256) as u8, (y / 64) as u8, 255])
    });
    PixelSurface::try_from(image).unwrap()
}

fn benchmark_extraction(criterion: &mut Criterion) {
    let source = knob_strip();
    let frame_count = NonZeroU32::new(128).unwrap();

    criterion.bench_function("extract 128 frames", |bencher| {
        bencher.iter(|| {
            let extractor =
                FrameExtractor::new(&source, frame_count, RemainderPolicy::Discard).unwrap();
            for frame in extractor.frames() {
                let _frame = frame.unwrap();
            }
        });
    });
}

fn benchmark_encoding(criterion: &mut Criterion) {
    let source = knob_strip();
    let extractor =
        FrameExtractor::new(&source, NonZeroU32::new(128).unwrap(), RemainderPolicy::Discard)
            .unwrap();
    let frame = extractor.extract(0).unwrap();
    let codec = ImageCodec::default();

    criterion.bench_function("encode one 64x64 frame (png)", |bencher| {
        bencher.iter(|| {
            let _bytes = codec.encode(&frame.surface, frame.index).unwrap();
        });
    });
}

fn benchmark_split(criterion: &mut Criterion) {
    let source = knob_strip();
    let temporary_directory = tempfile::tempdir().unwrap();
    let splitter =
        FilmstripSplitter::new(NonZeroU32::new(128).unwrap(), SplitOptions::new()).unwrap();

    let mut group = criterion.benchmark_group("split");
    group.sample_size(20);

    group.bench_function("split_surface 128 frames", |bencher| {
        bencher.iter(|| {
            let _report = splitter
                .split_surface(source.clone(), temporary_directory.path())
                .unwrap();
        });
    });

    #[cfg(feature = "rayon")]
    group.bench_function("split_surface_parallel 128 frames", |bencher| {
        bencher.iter(|| {
            let _report = splitter
                .split_surface_parallel(source.clone(), temporary_directory.path())
                .unwrap();
        });
    });

    group.finish();
}

criterion::criterion_group!(
    benches,
    benchmark_extraction,
    benchmark_encoding,
    benchmark_split,
);
criterion::criterion_main!(benches);
