//! A building block for density-based clustering of weighted points.
//!
//! The crate provides the containers that the CLUE clustering stages
//! operate on: a fixed-capacity [`VecArray`] with lock-free concurrent
//! append, a uniform [`TileGrid`] with optional wrap-around per axis, the
//! [`Tiles`] index that maps every point id to its tile, and the
//! Structure-of-Arrays [`PointBuffer`] shared by all stages.
//!
//! All working sets are sized up front; nothing allocates while a batch is
//! being processed. Shared containers support only concurrent appends,
//! implemented via an atomic fetch-add on the internal length, and reads
//! are sequenced after appends by the barrier between two stages.
//!
//! # Example
//!
//! ```
//! use clue_tiles::prelude::*;
//!
//! let grid: TileGrid<2> =
//!     TileGrid::new([0.0, 0.0], [10.0, 10.0], [1.0, 1.0], [false, false])?;
//! assert_eq!(grid.tiles_per_dim(0), 10);
//! assert_eq!(grid.tile_count(), 100);
//!
//! let tiles = Tiles::new(grid);
//! tiles.fill([2.5, 7.5], 0);
//! tiles.fill([2.7, 7.1], 1);
//!
//! let bin = tiles.grid().global_bin([2.5, 7.5]);
//! assert_eq!(tiles[bin].as_slice(), &[0, 1]);
//! # Ok::<(), clue_tiles::Error>(())
//! ```

pub mod grid;
pub mod points;
pub mod presets;
pub mod prelude;
pub mod tiles;
pub mod vec_array;

pub use crate::grid::{BinRange, TileGrid};
pub use crate::points::{PointBuffer, Points, PointsView, MAX_POINTS};
pub use crate::tiles::{Tile, Tiles, MAX_TILE_DEPTH};
pub use crate::vec_array::VecArray;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("axis {dim} has an empty value range [{min}, {max})")]
    EmptyAxisRange { dim: usize, min: f32, max: f32 },
    #[error("axis {dim} has a non-positive tile size ({tile_size})")]
    InvalidTileSize { dim: usize, tile_size: f32 },
}
