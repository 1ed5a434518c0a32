//! Full-pipeline benchmarks

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use image_authenticity::{AnalysisConfig, AuthenticityAnalyzer};

fn synthetic(width: u32, height: u32) -> DynamicImage {
    let mut state = 0x2545_f491u32;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let grain = (state >> 28) as u8;
        Rgb([
            (x % 256) as u8 ^ grain,
            (y % 256) as u8 ^ grain,
            ((x + y) % 256) as u8,
        ])
    }))
}

fn bench_pipeline(c: &mut Criterion) {
    let image = synthetic(1024, 768);

    c.bench_function("analyze_1024x768_parallel", |b| {
        let analyzer = AuthenticityAnalyzer::from_image(image.clone());
        b.iter(|| black_box(analyzer.analyze()));
    });

    c.bench_function("analyze_1024x768_sequential", |b| {
        let analyzer = AuthenticityAnalyzer::from_image(image.clone()).with_config(AnalysisConfig {
            parallel: false,
            ..AnalysisConfig::default()
        });
        b.iter(|| black_box(analyzer.analyze()));
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
