pub use crate::clusterer::ClueConfig;
pub use crate::clusterer::Clusterer;

pub use crate::kernel::ConvolutionKernel;

pub use crate::stages::assign_clusters;
pub use crate::stages::calculate_local_density;
pub use crate::stages::calculate_nearest_higher;
pub use crate::stages::fill_tiles;
pub use crate::stages::find_clusters;

pub use crate::FollowerList;
pub use crate::SeedList;
pub use crate::ASSIGN_STACK_DEPTH;
pub use crate::MAX_FOLLOWERS;
pub use crate::MAX_SEEDS;

pub use clue_tiles::prelude::*;
