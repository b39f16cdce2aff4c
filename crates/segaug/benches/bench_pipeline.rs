use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use segaug::{augment_samples_par, random_transform, AugmentConfig, ZoomRange};
use segaug_image::{ImageBatch, LabelBatch};

fn full_config() -> AugmentConfig {
    AugmentConfig {
        rotation_range: 20.0,
        width_shift_range: 0.1,
        height_shift_range: 0.1,
        shear_range: 0.1,
        zoom_range: ZoomRange::Spread(0.1),
        channel_shift_range: 0.1,
        horizontal_flip: true,
        vertical_flip: true,
        spline_warp: true,
        warp_sigma: 4.0,
        ..Default::default()
    }
}

fn bench_random_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("RandomTransform");
    let config = full_config();

    for (width, height) in [(128, 128), (256, 224), (512, 448)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image = ImageBatch::new([4, 3, *height, *width], vec![0.5f32; 4 * 3 * width * height]).unwrap();
        let mask = LabelBatch::from_masks([4, *height, *width], vec![1; 4 * width * height]).unwrap();

        group.bench_with_input(
            BenchmarkId::new("sequential", &parameter_string),
            &(&image, &mask),
            |b, i| {
                let (image, mask) = (i.0, i.1);
                let mut rng = StdRng::seed_from_u64(0);
                b.iter(|| {
                    random_transform(
                        black_box(image),
                        black_box(Some(mask)),
                        black_box(&config),
                        &mut rng,
                    )
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("per_sample_par", &parameter_string),
            &(&image, &mask),
            |b, i| {
                let (image, mask) = (i.0, i.1);
                b.iter(|| augment_samples_par(black_box(image), black_box(Some(mask)), black_box(&config), 0))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_random_transform);
criterion_main!(benches);
