//! Stage 5: ocean/threshold initialization.
//!
//! Flood-fills ocean from the border, derives the hill/mountain elevation
//! quantiles, softens the shallow ocean floor, and computes sea depth.

use std::collections::VecDeque;

use log::debug;

use crate::quantile::quantile_threshold;
use crate::world::{ElevationThreshold, World};

const SHALLOW_FACTOR: f32 = 0.85;
const HARMONIZE_GRADIENT: f32 = 0.2;
const DEPTH_FACTORS: [f32; 5] = [0.0, 0.3, 0.5, 0.7, 0.9];
const ANTI_ALIAS_PASSES: usize = 10;

pub fn run(world: &mut World) {
    let (width, height) = (world.width, world.height);
    let ocean_level = world.get_threshold(ElevationThreshold::Sea);

    debug!("ocean: flood-filling at level {ocean_level}");
    let ocean = flood_fill(&world.elevation, width, height, ocean_level);

    let hill = quantile_threshold(&world.elevation, Some(&ocean), 0.10);
    let mountain = quantile_threshold(&world.elevation, Some(&ocean), 0.03);
    world.set_threshold(ElevationThreshold::Hill, hill);
    world.set_threshold(ElevationThreshold::Mountain, mountain);
    debug!("ocean: hill={hill}, mountain={mountain}");

    harmonize(&mut world.elevation, &ocean, ocean_level);

    let sea_depth = sea_depth(&world.elevation, &ocean, width, height, ocean_level);

    world.ocean = Some(ocean);
    world.sea_depth = Some(sea_depth);
}

fn flood_fill(elevation: &[f32], width: usize, height: usize, ocean_level: f32) -> Vec<bool> {
    let mut ocean = vec![false; width * height];
    let mut queue = VecDeque::new();
    let idx = |x: usize, y: usize| y * width + x;

    let enqueue_if_border = |x: usize, y: usize, queue: &mut VecDeque<(usize, usize)>, ocean: &mut [bool]| {
        if elevation[idx(x, y)] <= ocean_level && !ocean[idx(x, y)] {
            ocean[idx(x, y)] = true;
            queue.push_back((x, y));
        }
    };

    for x in 0..width {
        enqueue_if_border(x, 0, &mut queue, &mut ocean);
        if height > 1 {
            enqueue_if_border(x, height - 1, &mut queue, &mut ocean);
        }
    }
    for y in 0..height {
        enqueue_if_border(0, y, &mut queue, &mut ocean);
        if width > 1 {
            enqueue_if_border(width - 1, y, &mut queue, &mut ocean);
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let (ix, iy) = (x as i64, y as i64);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (ix + dx, iy + dy);
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !ocean[idx(nx, ny)] && elevation[idx(nx, ny)] <= ocean_level {
                    ocean[idx(nx, ny)] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    ocean
}

fn harmonize(elevation: &mut [f32], ocean: &[bool], ocean_level: f32) {
    let shallow = SHALLOW_FACTOR * ocean_level;
    let target = shallow / 2.0;
    for (e, &is_ocean) in elevation.iter_mut().zip(ocean.iter()) {
        if is_ocean && *e < shallow {
            *e += (target - *e) * HARMONIZE_GRADIENT;
        }
    }
}

fn raw_depth(elevation: &[f32], ocean: &[bool], width: usize, height: usize, ocean_level: f32) -> Vec<f32> {
    let idx = |x: usize, y: usize| y * width + x;
    let distance = bfs_distance_to_land(ocean, width, height);

    let mut depth = vec![0.0_f32; width * height];
    for y in 0..height {
        for x in 0..width {
            if !ocean[idx(x, y)] {
                continue;
            }
            let raw = ocean_level - elevation[idx(x, y)];
            let d = distance[idx(x, y)];
            let factor = if d >= 1 && d <= 5 {
                DEPTH_FACTORS[d - 1]
            } else if d > 5 {
                *DEPTH_FACTORS.last().unwrap()
            } else {
                0.0
            };
            depth[idx(x, y)] = raw * factor;
        }
    }
    depth
}

fn sea_depth(elevation: &[f32], ocean: &[bool], width: usize, height: usize, ocean_level: f32) -> Vec<f32> {
    let mut depth = raw_depth(elevation, ocean, width, height, ocean_level);

    for _ in 0..ANTI_ALIAS_PASSES {
        depth = anti_alias(&depth, width, height);
    }

    renormalize(&mut depth);

    // The anti-alias passes blur depth into neighboring land cells; the
    // layer invariant requires exactly 0 off the ocean mask.
    for (d, &is_ocean) in depth.iter_mut().zip(ocean.iter()) {
        if !is_ocean {
            *d = 0.0;
        }
    }

    depth
}

/// BFS distance (in cells) from each ocean cell to the nearest non-ocean
/// cell, capped implicitly by however far the search has to travel.
fn bfs_distance_to_land(ocean: &[bool], width: usize, height: usize) -> Vec<usize> {
    let idx = |x: usize, y: usize| y * width + x;
    let mut dist = vec![usize::MAX; width * height];
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if !ocean[idx(x, y)] {
                dist[idx(x, y)] = 0;
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let base = dist[idx(x, y)];
        let (ix, iy) = (x as i64, y as i64);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (ix + dx, iy + dy);
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if dist[idx(nx, ny)] > base + 1 {
                    dist[idx(nx, ny)] = base + 1;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    dist
}

fn anti_alias(values: &[f32], width: usize, height: usize) -> Vec<f32> {
    let idx = |x: usize, y: usize| y * width + x;
    let mut out = values.to_vec();
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            let mut count = 0;
            let (ix, iy) = (x as i64, y as i64);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let (nx, ny) = (ix + dx, iy + dy);
                    if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                        continue;
                    }
                    sum += values[idx(nx as usize, ny as usize)];
                    count += 1;
                }
            }
            out[idx(x, y)] = sum / count as f32;
        }
    }
    out
}

fn renormalize(values: &mut [f32]) {
    let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if range <= f32::EPSILON {
        return;
    }
    for v in values.iter_mut() {
        *v = (*v - min) / range;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn flood_fill_excludes_enclosed_basin() {
        // 5x5 all-land except a 1-cell moat-free basin in the center and a
        // ring of ocean along the border.
        let w = 5;
        let mut elevation = vec![2.0; w * w];
        for x in 0..w {
            elevation[x] = 0.0;
            elevation[(w - 1) * w + x] = 0.0;
        }
        for y in 0..w {
            elevation[y * w] = 0.0;
            elevation[y * w + (w - 1)] = 0.0;
        }
        // Interior basin, unreachable from the border.
        elevation[2 * w + 2] = 0.0;

        let ocean = flood_fill(&elevation, w, w, 1.0);
        assert!(ocean[2 * w + 2] == false);
        assert!(ocean[0]);
    }

    #[test]
    fn sea_depth_is_bounded_and_zero_on_land() {
        let params = GenerationParams {
            width: 11,
            height: 11,
            ocean_level: 1.0,
            ..Default::default()
        };
        let mut elevation = vec![0.0_f32; 121];
        elevation[5 * 11 + 5] = 2.0;
        let mut world = World::new("t".into(), params, elevation, vec![0; 121]);

        run(&mut world);

        let depth = world.sea_depth.unwrap();
        for &d in &depth {
            assert!((0.0..=1.0).contains(&d));
        }
        assert_eq!(depth[5 * 11 + 5], 0.0);
    }

    #[test]
    fn sea_depth_ring_matches_expected_kernel_before_smoothing() {
        let w = 11;
        let mut elevation = vec![0.0_f32; w * w];
        elevation[5 * w + 5] = 2.0;
        let mut ocean = vec![true; w * w];
        ocean[5 * w + 5] = false;

        let depth = raw_depth(&elevation, &ocean, w, w, 1.0);

        let expected: [[f32; 11]; 11] = [
            [0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9],
            [0.9, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7],
            [0.9, 0.7, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.7, 0.7],
            [0.9, 0.7, 0.5, 0.3, 0.3, 0.3, 0.3, 0.3, 0.5, 0.7, 0.7],
            [0.9, 0.7, 0.5, 0.3, 0.0, 0.0, 0.0, 0.3, 0.5, 0.7, 0.7],
            [0.9, 0.7, 0.5, 0.3, 0.0, 0.0, 0.0, 0.3, 0.5, 0.7, 0.7],
            [0.9, 0.7, 0.5, 0.3, 0.0, 0.0, 0.0, 0.3, 0.5, 0.7, 0.7],
            [0.9, 0.7, 0.5, 0.3, 0.3, 0.3, 0.3, 0.3, 0.5, 0.7, 0.7],
            [0.9, 0.7, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.7, 0.7],
            [0.9, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7],
            [0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9],
        ];

        for y in 0..w {
            for x in 0..w {
                if y == 5 && x == 5 {
                    continue; // the land cell itself, not part of the ocean comparison.
                }
                approx::assert_abs_diff_eq!(depth[y * w + x], expected[y][x], epsilon = 1e-6);
            }
        }
    }
}
