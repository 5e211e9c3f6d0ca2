use std::time::Instant;

use ahash::AHashMap;
use log::info;
use num_format::{Locale, ToFormattedString};
use rayon::prelude::*;

use clue_tiles::{PointBuffer, Points, TileGrid, Tiles};

use crate::kernel::ConvolutionKernel;
use crate::stages;
use crate::{FollowerList, SeedList};

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ClueConfig {
    /// Radius of the neighborhood that contributes to a point's local
    /// density. Defaults to 0.0 and must be set for any useful
    /// clustering.
    #[cfg_attr(feature = "clap", clap(long))]
    pub dc: f32,

    /// Minimum local density required to promote a point to a seed.
    /// Defaults to 0.0 and must be set for any useful clustering.
    #[cfg_attr(feature = "clap", clap(long))]
    pub rhoc: f32,

    /// Multiplier applied to `dc` to obtain the nearest-higher and
    /// outlier search radius.
    #[cfg_attr(feature = "clap", clap(long, default_value_t = ClueConfig::DEFAULT_OUTLIER_FACTOR))]
    pub outlier_factor: f32,

    /// Number of points processed in batch by a single thread.
    #[cfg_attr(feature = "clap", clap(long, default_value_t = ClueConfig::DEFAULT_CHUNK_SIZE))]
    pub chunk_size: usize,

    /// Log the grid geometry when the clusterer is constructed.
    #[cfg_attr(feature = "clap", clap(long))]
    pub verbose: bool,
}

impl Default for ClueConfig {
    fn default() -> Self {
        Self::new(0.0, 0.0, Self::DEFAULT_OUTLIER_FACTOR)
    }
}

impl ClueConfig {
    pub const DEFAULT_OUTLIER_FACTOR: f32 = 2.0;
    pub const DEFAULT_CHUNK_SIZE: usize = 256;

    pub fn new(dc: f32, rhoc: f32, outlier_factor: f32) -> Self {
        Self {
            dc,
            rhoc,
            outlier_factor,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            verbose: false,
        }
    }
}

/// The orchestrator: owns every working set and sequences the five
/// stages over one batch of points at a time.
///
/// All buffers are reused across batches; a new batch only re-declares
/// the sizes. Cluster ids are dense indices into the seed list of the
/// batch; their ordering across runs is not deterministic, cluster
/// membership is.
pub struct Clusterer<const D: usize> {
    config: ClueConfig,
    kernel: ConvolutionKernel,
    tiles: Tiles<D>,
    points: PointBuffer<D>,
    seeds: SeedList,
    followers: Vec<FollowerList>,
}

impl<const D: usize> Clusterer<D> {
    pub fn new(grid: TileGrid<D>, config: ClueConfig) -> Self {
        if config.verbose {
            for dim in 0..D {
                info!(
                    "dim {}: {} tiles of size {} in the range ({}, {})",
                    dim + 1,
                    grid.tiles_per_dim(dim),
                    grid.tile_size(dim),
                    grid.min(dim),
                    grid.max(dim)
                );
            }
        }

        Self {
            config,
            kernel: ConvolutionKernel::default(),
            tiles: Tiles::new(grid),
            points: PointBuffer::new(),
            seeds: SeedList::new(),
            followers: Vec::new(),
        }
    }

    /// Replaces the default Gaussian density kernel.
    pub fn with_kernel(mut self, kernel: ConvolutionKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn config(&self) -> &ClueConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid<D> {
        self.tiles.grid()
    }

    /// Uploads an input batch and resets tiles, seed list and follower
    /// lists. Returns `false` iff the batch is empty.
    pub fn clear_and_set_points(&mut self, points: &Points<D>) -> bool {
        if !self.points.clear_and_set(points) {
            return false;
        }
        let n = self.points.len();

        self.tiles.clear();
        self.seeds.reset();

        // The follower adjacency grows with the largest batch seen and
        // is only reset up to the current size.
        if self.followers.len() < n {
            self.followers.resize_with(n, FollowerList::new);
        }
        self.followers[..n].par_iter_mut().for_each(|list| list.reset());

        true
    }

    /// Resets the tile index only, for reuse across detector layers.
    pub fn clear_layer_tiles(&mut self) {
        self.tiles.clear();
    }

    /// Runs the full pipeline over `points` and returns the per-point
    /// cluster index (`-1` for outliers) and seed flag.
    ///
    /// An empty batch yields empty labels.
    pub fn make_clusters(&mut self, points: &Points<D>) -> (Vec<i32>, Vec<bool>) {
        if !self.clear_and_set_points(points) {
            return (Vec::new(), Vec::new());
        }

        let n = self.points.len();
        let ClueConfig {
            dc,
            rhoc,
            outlier_factor,
            chunk_size,
            ..
        } = self.config;
        let view = self.points.view();

        info!(
            "Clustering {} points",
            n.to_formatted_string(&Locale::en)
        );

        let start = Instant::now();
        stages::fill_tiles(&self.tiles, &view, chunk_size);
        info!("Filled tiles in {:?}", start.elapsed());

        let start = Instant::now();
        stages::calculate_local_density(&self.tiles, &view, &self.kernel, dc, chunk_size);
        info!("Calculated local density in {:?}", start.elapsed());

        let start = Instant::now();
        stages::calculate_nearest_higher(&self.tiles, &view, outlier_factor, dc, chunk_size);
        info!("Calculated nearest higher in {:?}", start.elapsed());

        let start = Instant::now();
        stages::find_clusters(
            &self.seeds,
            &self.followers,
            &view,
            outlier_factor,
            dc,
            rhoc,
            chunk_size,
        );
        info!(
            "Found {} seeds in {:?}",
            self.seeds.len(),
            start.elapsed()
        );

        let start = Instant::now();
        stages::assign_clusters(&self.seeds, &self.followers, &view);
        info!("Assigned clusters in {:?}", start.elapsed());

        (
            self.points.cluster_index().to_vec(),
            self.points.is_seed().to_vec(),
        )
    }

    /// Regroups the last batch's points by cluster id.
    ///
    /// Outliers are grouped under `-1`; consumers building clusters skip
    /// that key.
    pub fn get_clusters(&self) -> AHashMap<i32, Vec<u32>> {
        let mut clusters = AHashMap::new();
        for (id, &cluster) in self.points.cluster_index().iter().enumerate() {
            clusters
                .entry(cluster)
                .or_insert_with(Vec::new)
                .push(id as u32);
        }
        clusters
    }

    /// Number of points in the current batch.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Auxiliary scalars of the current batch, carried through
    /// unchanged for external consumers.
    pub fn add_coord(&self) -> &[f32] {
        self.points.add_coord()
    }

    /// Local densities of the current batch.
    pub fn rho(&self) -> &[f32] {
        self.points.rho()
    }

    /// Distances to the nearest higher of the current batch.
    pub fn delta(&self) -> &[f32] {
        self.points.delta()
    }

    /// Nearest-higher ids of the current batch, `-1` where none exists.
    pub fn nearest_higher(&self) -> &[i32] {
        self.points.nearest_higher()
    }

    /// Cluster ids of the current batch, `-1` for outliers.
    pub fn cluster_index(&self) -> &[i32] {
        self.points.cluster_index()
    }

    /// Seed flags of the current batch.
    pub fn is_seed(&self) -> &[bool] {
        self.points.is_seed()
    }

    /// Ids collected into the seed list, in collection order.
    pub fn seeds(&self) -> &[u32] {
        self.seeds.as_slice()
    }
}
