use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::grid::TileGrid;
use crate::vec_array::VecArray;

/// Maximum number of point ids held by a single tile. Appends beyond the
/// capacity are dropped and recorded in the saturation counter.
pub const MAX_TILE_DEPTH: usize = 40;

pub type Tile = VecArray<u32, MAX_TILE_DEPTH>;

/// The spatial index: one bounded vector of point ids per tile of the
/// grid, addressed by global bin.
///
/// Filling is concurrent; clearing is exclusive and happens between
/// batches only.
pub struct Tiles<const D: usize> {
    grid: TileGrid<D>,
    tiles: Box<[Tile]>,
    dropped: AtomicU64,
}

impl<const D: usize> Tiles<D> {
    pub fn new(grid: TileGrid<D>) -> Self {
        let mut tiles = Vec::with_capacity(grid.tile_count());
        tiles.resize_with(grid.tile_count(), Tile::new);

        Self {
            grid,
            tiles: tiles.into_boxed_slice(),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn grid(&self) -> &TileGrid<D> {
        &self.grid
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Resets every tile and the saturation counter.
    pub fn clear(&mut self) {
        self.tiles.par_iter_mut().for_each(|tile| tile.reset());
        *self.dropped.get_mut() = 0;
    }

    /// Appends `id` to the tile holding `coords`.
    pub fn fill(&self, coords: [f32; D], id: u32) {
        if self.tiles[self.grid.global_bin(coords)].push(id).is_none() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of ids dropped on saturated tiles since the last clear.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const D: usize> Index<usize> for Tiles<D> {
    type Output = Tile;

    fn index(&self, global_bin: usize) -> &Tile {
        &self.tiles[global_bin]
    }
}
