use log::info;
use rand::prelude::*;

use clue::prelude::*;

fn main() {
    // First, we want to prepare some logging, so that we can see the
    // per-stage timings of what's going on.
    env_logger::init();

    // Next we synthesize a batch of calorimeter-like hits: a number of
    // showers, each a tight clump of weighted points on the CLD endcap
    // plane, plus a sprinkle of uniform noise.
    let mut rng = StdRng::seed_from_u64(42);
    let mut points = Points::new();

    for _ in 0..50 {
        let cx = rng.gen_range(-2000.0..2000.0_f32);
        let cy = rng.gen_range(-2000.0..2000.0_f32);
        for _ in 0..100 {
            points.push(
                [cx + rng.gen_range(-25.0..25.0), cy + rng.gen_range(-25.0..25.0)],
                rng.gen_range(0.1..5.0),
            );
        }
    }
    for _ in 0..200 {
        points.push(
            [
                rng.gen_range(-2400.0..2400.0),
                rng.gen_range(-2400.0..2400.0),
            ],
            0.1,
        );
    }

    // The clusterer is parameterized by the tile grid of the detector
    // region and the three clustering parameters: the density radius
    // dc, the seed threshold rhoc and the outlier factor. The flat
    // kernel makes the density a weighted hit count.
    let config = ClueConfig {
        verbose: true,
        ..ClueConfig::new(20.0, 5.0, 2.0)
    };
    let mut clusterer =
        Clusterer::new(cld_endcap(), config).with_kernel(ConvolutionKernel::flat(0.5));

    // One call runs the five stages and hands back the per-point labels.
    let (cluster_index, is_seed) = time(|| clusterer.make_clusters(&points));

    let seeds = is_seed.iter().filter(|&&s| s).count();
    let outliers = cluster_index.iter().filter(|&&c| c < 0).count();
    info!(
        "Clustered {} hits: {} seeds, {} outliers",
        points.len(),
        seeds,
        outliers
    );

    // The map view regroups the labels by cluster; the -1 entry holds
    // the outliers and is skipped when building physics objects.
    let clusters = clusterer.get_clusters();
    let largest = clusters
        .iter()
        .filter(|(&id, _)| id >= 0)
        .map(|(_, members)| members.len())
        .max()
        .unwrap_or(0);
    info!(
        "{} clusters, largest holds {} hits",
        clusters.len() - usize::from(outliers > 0),
        largest
    );
}

fn time<T, F: FnOnce() -> T>(f: F) -> T {
    let start = std::time::Instant::now();
    let res = f();
    info!("Execution took {:?}", start.elapsed());
    res
}
