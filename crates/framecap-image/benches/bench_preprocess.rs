use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use framecap_image::color::rgb_from_bgr;
use framecap_image::resize::{resize_fast, InterpolationMode};
use framecap_image::{Image, ImageSize};

fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");
    let frame_sizes = vec![(640, 360), (1280, 720), (1920, 1080)];
    let model_size = ImageSize {
        width: 384,
        height: 384,
    };

    for (width, height) in frame_sizes {
        let frame_size = ImageSize { width, height };
        let id = format!("{}x{}", width, height);
        let frame = Image::<u8, 3>::new(frame_size, vec![0u8; width * height * 3]).unwrap();

        let mut rgb = Image::<u8, 3>::from_size_val(frame_size, 0).unwrap();
        let mut resized = Image::<u8, 3>::from_size_val(model_size, 0).unwrap();

        group.bench_with_input(BenchmarkId::new("rgb_from_bgr", &id), &frame, |b, i| {
            b.iter(|| rgb_from_bgr(black_box(i), black_box(&mut rgb)))
        });
        group.bench_with_input(BenchmarkId::new("resize_bicubic", &id), &frame, |b, i| {
            b.iter(|| {
                resize_fast(
                    black_box(i),
                    black_box(&mut resized),
                    InterpolationMode::Bicubic,
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("resize_bilinear", &id), &frame, |b, i| {
            b.iter(|| {
                resize_fast(
                    black_box(i),
                    black_box(&mut resized),
                    InterpolationMode::Bilinear,
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("resize_nearest", &id), &frame, |b, i| {
            b.iter(|| {
                resize_fast(
                    black_box(i),
                    black_box(&mut resized),
                    InterpolationMode::Nearest,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_preprocess);
criterion_main!(benches);
