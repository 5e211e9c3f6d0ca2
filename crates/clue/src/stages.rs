//! The five data-parallel stages of the clustering pipeline.
//!
//! Every stage runs one logical task per point (per seed for the
//! assignment stage) and is free of recoverable errors: saturating a
//! bounded container drops the overflowing data, bumps a counter and is
//! reported as a warning, never as a failure. The orchestrator provides
//! the barrier between two stages; within a stage, task interleaving is
//! unspecified.
//!
//! The stages are public so that intermediate state can be observed by
//! tests and external diagnostics.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use log::warn;
use num_format::{Locale, ToFormattedString};
use rayon::prelude::*;

use clue_tiles::{PointsView, Tiles};

use crate::kernel::ConvolutionKernel;
use crate::{FollowerList, SeedList, ASSIGN_STACK_DEPTH};

const INF: f32 = f32::MAX;
const NO_HIGHER: i32 = -1;

/// Stage 1: append every point id to the tile holding its coordinates.
pub fn fill_tiles<const D: usize>(tiles: &Tiles<D>, points: &PointsView<D>, chunk_size: usize) {
    (0..points.n())
        .into_par_iter()
        .chunks(chunk_size)
        .for_each(|chunk| {
            for i in chunk {
                // SAFETY: i < n.
                tiles.fill(unsafe { points.coords(i) }, i as u32);
            }
        });

    let dropped = tiles.dropped();
    if dropped > 0 {
        warn!(
            "tile depth saturated, dropped {} point ids",
            dropped.to_formatted_string(&Locale::en)
        );
    }
}

/// Stage 2: accumulate the local density of every point.
///
/// Each task sums `kernel(d) * weight[j]` over all points `j` within
/// `dc` of its own point, itself included, into a private accumulator
/// and stores the result in `rho[i]`.
pub fn calculate_local_density<const D: usize>(
    tiles: &Tiles<D>,
    points: &PointsView<D>,
    kernel: &ConvolutionKernel,
    dc: f32,
    chunk_size: usize,
) {
    let n = points.n();
    let dc_sq = dc * dc;
    let next_chunk = AtomicUsize::new(0);

    rayon::scope(|s| {
        for _ in 0..rayon::current_num_threads() {
            s.spawn(|_| loop {
                let start = next_chunk.fetch_add(chunk_size, Ordering::AcqRel);
                if start >= n {
                    break;
                }
                let end = (start + chunk_size).min(n);

                for i in start..end {
                    // SAFETY: i < n.
                    let coords_i = unsafe { points.coords(i) };
                    let mut rho_i = 0.0_f32;

                    let search_box = tiles.grid().search_box(coords_i, dc);
                    tiles.grid().for_each_tile_in_box(&search_box, |bin| {
                        for &j in tiles[bin].as_slice() {
                            // SAFETY: tile entries are point ids below n.
                            let coords_j = unsafe { points.coords(j as usize) };
                            let dist_sq = tiles.grid().distance_squared(coords_i, coords_j);
                            if dist_sq <= dc_sq {
                                // SAFETY: as above.
                                let weight_j = unsafe { points.weight(j as usize) };
                                rho_i += kernel.weight(dist_sq.sqrt(), i as u32, j) * weight_j;
                            }
                        }
                    });

                    // SAFETY: this task is the exclusive writer of rho[i].
                    unsafe { points.set_rho(i, rho_i) };
                }
            });
        }
    });
}

/// Stage 3: find, for every point, the closest point of strictly higher
/// density within `outlier_factor * dc`.
///
/// Ties at identical positive density orient towards the larger id;
/// that keeps the nearest-higher graph acyclic. Points with no such
/// neighbor keep `delta = sqrt(f32::MAX)` and `nearest_higher = -1`.
pub fn calculate_nearest_higher<const D: usize>(
    tiles: &Tiles<D>,
    points: &PointsView<D>,
    outlier_factor: f32,
    dc: f32,
    chunk_size: usize,
) {
    let n = points.n();
    let dm = outlier_factor * dc;
    let dm_sq = dm * dm;
    let next_chunk = AtomicUsize::new(0);

    rayon::scope(|s| {
        for _ in 0..rayon::current_num_threads() {
            s.spawn(|_| loop {
                let start = next_chunk.fetch_add(chunk_size, Ordering::AcqRel);
                if start >= n {
                    break;
                }
                let end = (start + chunk_size).min(n);

                for i in start..end {
                    // SAFETY: i < n.
                    let coords_i = unsafe { points.coords(i) };
                    let rho_i = unsafe { points.rho(i) };

                    let mut delta_sq = INF;
                    let mut nearest = NO_HIGHER;

                    let search_box = tiles.grid().search_box(coords_i, dm);
                    tiles.grid().for_each_tile_in_box(&search_box, |bin| {
                        for &j in tiles[bin].as_slice() {
                            // SAFETY: tile entries are point ids below n.
                            let rho_j = unsafe { points.rho(j as usize) };
                            let higher = rho_j > rho_i
                                || (rho_j == rho_i && rho_j > 0.0 && j as usize > i);
                            if !higher {
                                continue;
                            }

                            // SAFETY: as above.
                            let coords_j = unsafe { points.coords(j as usize) };
                            let dist_sq = tiles.grid().distance_squared(coords_i, coords_j);
                            if dist_sq <= dm_sq && dist_sq < delta_sq {
                                delta_sq = dist_sq;
                                nearest = j as i32;
                            }
                        }
                    });

                    // SAFETY: this task is the exclusive writer of index i.
                    unsafe {
                        points.set_delta(i, delta_sq.sqrt());
                        points.set_nearest_higher(i, nearest);
                    }
                }
            });
        }
    });
}

/// Stage 4: split the points into seeds, followers and outliers.
///
/// Seeds enter the global seed list, every other non-outlier enters the
/// follower list of its nearest higher. Seeds themselves are never
/// recorded as followers.
pub fn find_clusters<const D: usize>(
    seeds: &SeedList,
    followers: &[FollowerList],
    points: &PointsView<D>,
    outlier_factor: f32,
    dc: f32,
    rhoc: f32,
    chunk_size: usize,
) {
    let dropped_seeds = AtomicU64::new(0);
    let dropped_followers = AtomicU64::new(0);

    (0..points.n())
        .into_par_iter()
        .chunks(chunk_size)
        .for_each(|chunk| {
            for i in chunk {
                // SAFETY: i < n; this task owns the per-point entries of i.
                unsafe { points.set_cluster_index(i, -1) };

                let delta_i = unsafe { points.delta(i) };
                let rho_i = unsafe { points.rho(i) };

                let is_seed = delta_i > dc && rho_i >= rhoc;
                let is_outlier = delta_i > outlier_factor * dc && rho_i < rhoc;

                if is_seed {
                    unsafe { points.set_is_seed(i, true) };
                    if seeds.push(i as u32).is_none() {
                        dropped_seeds.fetch_add(1, Ordering::Relaxed);
                    }
                } else {
                    if !is_outlier {
                        // A non-outlier that is not a seed always has a
                        // nearest higher within the search radius.
                        let nh = unsafe { points.nearest_higher(i) };
                        if followers[nh as usize].push(i as u32).is_none() {
                            dropped_followers.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    unsafe { points.set_is_seed(i, false) };
                }
            }
        });

    let dropped_seeds = dropped_seeds.into_inner();
    if dropped_seeds > 0 {
        warn!(
            "seed list saturated, dropped {} seeds",
            dropped_seeds.to_formatted_string(&Locale::en)
        );
    }
    let dropped_followers = dropped_followers.into_inner();
    if dropped_followers > 0 {
        warn!(
            "follower lists saturated, dropped {} links",
            dropped_followers.to_formatted_string(&Locale::en)
        );
    }
}

/// Stage 5: propagate cluster ids from the seeds through the follower
/// trees.
///
/// One task per seed walks its tree iteratively with a fixed-depth local
/// stack; a follower found when the stack is full still receives its
/// cluster id but its own subtree is dropped and counted.
pub fn assign_clusters<const D: usize>(
    seeds: &SeedList,
    followers: &[FollowerList],
    points: &PointsView<D>,
) {
    let truncated = AtomicU64::new(0);

    seeds
        .as_slice()
        .par_iter()
        .enumerate()
        .for_each(|(cluster_id, &seed)| {
            let mut stack = [0_u32; ASSIGN_STACK_DEPTH];
            let mut depth = 0_usize;

            // SAFETY: seed ids are below n, and the follower trees of
            // distinct seeds are disjoint, so every entry written here
            // has a single writer.
            unsafe { points.set_cluster_index(seed as usize, cluster_id as i32) };
            stack[depth] = seed;
            depth += 1;

            while depth > 0 {
                depth -= 1;
                let node = stack[depth];
                // SAFETY: as above.
                let cluster = unsafe { points.cluster_index(node as usize) };

                for &follower in followers[node as usize].as_slice() {
                    // SAFETY: as above.
                    unsafe { points.set_cluster_index(follower as usize, cluster) };
                    if depth < ASSIGN_STACK_DEPTH {
                        stack[depth] = follower;
                        depth += 1;
                    } else {
                        truncated.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        });

    let truncated = truncated.into_inner();
    if truncated > 0 {
        warn!(
            "traversal stack saturated, dropped {} subtrees",
            truncated.to_formatted_string(&Locale::en)
        );
    }
}
