use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

use clue::prelude::*;

fn detector_batch(n_showers: usize, hits_per_shower: usize) -> Points<2> {
    let seed = 42;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Points::with_capacity(n_showers * hits_per_shower);

    for _ in 0..n_showers {
        let cx = rng.gen_range(-2300.0..2300.0_f32);
        let cy = rng.gen_range(-2300.0..2300.0_f32);
        for _ in 0..hits_per_shower {
            let x = cx + rng.gen_range(-30.0..30.0);
            let y = cy + rng.gen_range(-30.0..30.0);
            points.push([x, y], rng.gen_range(0.1..5.0));
        }
    }

    points
}

fn make_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_clusters");
    group.sample_size(10);

    for (n_showers, hits) in [(20, 100), (100, 200)] {
        let points = detector_batch(n_showers, hits);
        let mut clusterer = Clusterer::new(cld_endcap(), ClueConfig::new(20.0, 2.0, 2.0))
            .with_kernel(ConvolutionKernel::flat(0.5));

        group.bench_function(format!("{}_showers_{}_hits", n_showers, hits), |b| {
            b.iter(|| black_box(clusterer.make_clusters(&points)))
        });
    }

    group.finish();
}

criterion_group!(benches, make_clusters);
criterion_main!(benches);
