//! Tile-grid descriptors for the supported calorimeters.
//!
//! Barrel grids bin `(z, phi)` with a periodic azimuth; endcap grids bin
//! `(x, y)` on open axes.

use std::f32::consts::PI;

use crate::grid::TileGrid;

pub fn cld_barrel() -> TileGrid<2> {
    TileGrid::new([-2210.0, -PI], [2210.0, PI], [15.0, 0.01], [false, true])
        .expect("CLD barrel geometry is valid")
}

pub fn cld_endcap() -> TileGrid<2> {
    TileGrid::new(
        [-2455.0, -2455.0],
        [2455.0, 2455.0],
        [15.0, 15.0],
        [false, false],
    )
    .expect("CLD endcap geometry is valid")
}

pub fn clicdet_barrel() -> TileGrid<2> {
    TileGrid::new([-2210.0, -PI], [2210.0, PI], [35.0, 0.15], [false, true])
        .expect("CLICdet barrel geometry is valid")
}

pub fn clicdet_endcap() -> TileGrid<2> {
    TileGrid::new(
        [-1701.0, -1701.0],
        [1701.0, 1701.0],
        [27.0, 27.0],
        [false, false],
    )
    .expect("CLICdet endcap geometry is valid")
}

pub fn lar_barrel() -> TileGrid<2> {
    TileGrid::new([-3110.0, -PI], [3110.0, PI], [50.0, 0.15], [false, true])
        .expect("LAr barrel geometry is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barrel_grids_wrap_the_azimuth() {
        for grid in [cld_barrel(), clicdet_barrel(), lar_barrel()] {
            assert!(!grid.is_wrapped(0));
            assert!(grid.is_wrapped(1));
            assert_eq!(grid.bin(-PI, 1), grid.bin(PI, 1));
        }
    }

    #[test]
    fn endcap_grids_are_open() {
        for grid in [cld_endcap(), clicdet_endcap()] {
            assert!(!grid.is_wrapped(0));
            assert!(!grid.is_wrapped(1));
        }
    }

    #[test]
    fn tile_counts_match_the_descriptors() {
        let grid = cld_endcap();
        assert_eq!(grid.tiles_per_dim(0), 328);
        assert_eq!(grid.tiles_per_dim(1), 328);
        assert_eq!(grid.tile_count(), 328 * 328);
    }
}
