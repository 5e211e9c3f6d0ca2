//! A parallel implementation of CLUE, the density-based clustering
//! algorithm for calorimeter hits.
//!
//! CLUE partitions a batch of weighted points by estimating a local
//! density around each point, finding for each point its nearest
//! neighbor of strictly higher density, promoting dense and isolated
//! points to *seeds*, and assigning every non-outlier to the cluster of
//! the seed reachable through its chain of nearest-higher ancestors.
//!
//! The pipeline is bulk-synchronous: five data-parallel stages separated
//! by barriers, one logical task per point (per seed in the last stage).
//! The spatial search uses the uniform tile grid of [`clue_tiles`],
//! including periodic axes for barrel geometries.
//!
//! # Example
//!
//! ```
//! use clue::prelude::*;
//!
//! // A 2-D grid over [0, 20)² with unit tiles and open axes.
//! let grid: TileGrid<2> =
//!     TileGrid::new([0.0, 0.0], [20.0, 20.0], [1.0, 1.0], [false, false])?;
//!
//! // Two compact triangles of hits, far apart from each other.
//! let mut points = Points::new();
//! for (x, y) in [(1.0, 1.0), (1.1, 1.0), (1.0, 1.1), (9.0, 9.0), (9.1, 9.0), (9.0, 9.1)] {
//!     points.push([x, y], 1.0);
//! }
//!
//! let mut clusterer = Clusterer::new(grid, ClueConfig::new(0.5, 1.5, 2.0))
//!     .with_kernel(ConvolutionKernel::flat(1.0));
//! let (cluster_index, is_seed) = clusterer.make_clusters(&points);
//!
//! // Each triangle promotes one seed and forms one cluster.
//! assert_eq!(is_seed.iter().filter(|&&s| s).count(), 2);
//! assert_eq!(cluster_index[0], cluster_index[1]);
//! assert_ne!(cluster_index[0], cluster_index[3]);
//! # Ok::<(), clue::Error>(())
//! ```

pub mod clusterer;
pub mod kernel;
pub mod prelude;
pub mod stages;

pub use crate::clusterer::{ClueConfig, Clusterer};
pub use crate::kernel::ConvolutionKernel;

pub use clue_tiles::Error;

use clue_tiles::VecArray;

/// Hard ceiling on the number of seeds collected per batch.
pub const MAX_SEEDS: usize = 100;

/// Hard ceiling on the number of direct followers per point.
pub const MAX_FOLLOWERS: usize = 100;

/// Depth of the per-seed traversal stack in the assignment stage; a hard
/// cap on follower-tree depth.
pub const ASSIGN_STACK_DEPTH: usize = 256;

/// Ids of the points promoted to seeds, in collection order.
pub type SeedList = VecArray<u32, MAX_SEEDS>;

/// Ids of the points that chose a common nearest higher.
pub type FollowerList = VecArray<u32, MAX_FOLLOWERS>;
