pub use crate::grid::BinRange;
pub use crate::grid::TileGrid;

pub use crate::points::PointBuffer;
pub use crate::points::Points;
pub use crate::points::PointsView;
pub use crate::points::MAX_POINTS;

pub use crate::presets::*;

pub use crate::tiles::Tile;
pub use crate::tiles::Tiles;
pub use crate::tiles::MAX_TILE_DEPTH;

pub use crate::vec_array::VecArray;

pub use crate::Error;
