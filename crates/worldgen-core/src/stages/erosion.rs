//! Stage 8: erosion (river and lake simulation).
//!
//! A three-tier router per river: steepest-descent flow, a radial search
//! for a lower cell with A* fallback, and an edge-wrap splice when the
//! lower cell is only reachable by wrapping. The radial search never
//! widens past radius 1 here -- a preserved quirk: since the steepest-
//! descent step already rules out every cell within radius 1, the radial
//! search can never find a candidate the descent step missed, so rivers
//! that can't descend or reach an existing river/ocean always end as
//! lakes. Reproduced deliberately rather than "fixed" by letting the
//! radius grow, per the rule that this behavior is preserved as observed.

use std::collections::HashSet;

use log::{debug, warn};

use crate::astar;
use crate::world::World;

const RIVER_THRESHOLD: f32 = 0.02;
const SEED_ISOLATION_RADIUS: i64 = 9;
const SEARCH_MAX_RADIUS: i64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Center,
    North,
    East,
    South,
    West,
}

impl Direction {
    fn offset(self) -> (i64, i64) {
        match self {
            Direction::Center => (0, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

pub fn run(world: &mut World) {
    let (width, height) = (world.width, world.height);
    debug!("erosion: computing flow direction for {width}x{height}");

    let flow = flow_direction(&world.elevation, width, height);
    let precipitation = world
        .precipitation
        .clone()
        .expect("precipitation must run before erosion");

    let water_flow = water_flow_accumulation(&flow, &precipitation, width, height);
    let seeds = river_seeds(world, &flow, &water_flow, width, height);
    debug!("erosion: {} river seeds", seeds.len());

    let mut rivers: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut lakes: Vec<(usize, usize)> = Vec::new();

    for seed in seeds {
        let river = trace_river(world, seed, &rivers, &mut lakes);
        if river.len() < 2 {
            continue;
        }
        clean_up_flow(world, &river);
        carve_valley(world, &river);
        rivers.push(river);
    }

    let mut river_map = vec![0.0_f32; width * height];
    for river in &rivers {
        fill_river_map(&water_flow, &precipitation, river, &mut river_map, width);
    }

    let mut lake_map = vec![0.0_f32; width * height];
    let mut seen_lakes = HashSet::new();
    for (x, y) in &lakes {
        if seen_lakes.insert((*x, *y)) {
            lake_map[y * width + x] = 0.1;
        }
    }

    // Creek/River/MainRiver thresholds are owned by the watermap stage,
    // which runs next and recomputes them over the actual water map.

    world.river_map = Some(river_map);
    world.lake_map = Some(lake_map);
}

fn flow_direction(elevation: &[f32], width: usize, height: usize) -> Vec<Direction> {
    let idx = |x: usize, y: usize| y * width + x;
    let mut flow = vec![Direction::Center; width * height];

    for y in 0..height {
        for x in 0..width {
            let here = elevation[idx(x, y)];
            let mut best = here;
            let mut best_dir = Direction::Center;

            for dir in [Direction::North, Direction::East, Direction::South, Direction::West] {
                let (dx, dy) = dir.offset();
                let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    continue;
                }
                let e = elevation[idx(nx as usize, ny as usize)];
                if e < best {
                    best = e;
                    best_dir = dir;
                }
            }

            flow[idx(x, y)] = best_dir;
        }
    }

    flow
}

fn water_flow_accumulation(flow: &[Direction], precipitation: &[f32], width: usize, height: usize) -> Vec<f32> {
    let idx = |x: usize, y: usize| y * width + x;
    let mut water_flow = precipitation.to_vec();

    for y in 0..height {
        for x in 0..width {
            if flow[idx(x, y)] == Direction::Center {
                continue;
            }
            let rainfall = precipitation[idx(x, y)];
            let (mut cx, mut cy) = (x, y);

            loop {
                let dir = flow[idx(cx, cy)];
                if dir == Direction::Center {
                    break;
                }
                let (dx, dy) = dir.offset();
                let (nx, ny) = (cx as i64 + dx, cy as i64 + dy);
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    break;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                water_flow[idx(nx, ny)] += rainfall;
                cx = nx;
                cy = ny;
            }
        }
    }

    water_flow
}

fn river_seeds(world: &World, flow: &[Direction], water_flow: &[f32], width: usize, height: usize) -> Vec<(usize, usize)> {
    let idx = |x: usize, y: usize| y * width + x;
    let mut seeds: Vec<(usize, usize)> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if flow[idx(x, y)] == Direction::Center {
                continue;
            }
            if !world.is_mountain(x, y) {
                continue;
            }
            if water_flow[idx(x, y)] < RIVER_THRESHOLD {
                continue;
            }
            let isolated = seeds.iter().all(|&(sx, sy)| {
                let dx = (sx as i64 - x as i64).abs();
                let dy = (sy as i64 - y as i64).abs();
                dx.max(dy) > SEED_ISOLATION_RADIUS
            });
            if isolated {
                seeds.push((x, y));
            }
        }
    }

    seeds
}

fn steepest_descent(elevation: &[f32], width: usize, height: usize, x: usize, y: usize) -> Option<(usize, usize)> {
    let idx = |x: usize, y: usize| y * width + x;
    let here = elevation[idx(x, y)];
    let mut best: Option<(usize, usize)> = None;
    let mut best_elev = here;

    for (dx, dy) in [(0_i64, -1_i64), (1, 0), (0, 1), (-1, 0)] {
        let (nx, ny) = (x as i64 + dx, y as i64 + dy);
        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
            continue;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        let e = elevation[idx(nx, ny)];
        if e < best_elev {
            best_elev = e;
            best = Some((nx, ny));
        }
    }

    best
}

struct LowerElevation {
    pos: (usize, usize),
    wrapped: bool,
}

/// Radial search for a cell with strictly lower elevation than `(x, y)`.
/// Radius is fixed at 1 -- see the module doc comment.
fn find_lower_elevation(elevation: &[f32], width: usize, height: usize, x: usize, y: usize) -> Option<LowerElevation> {
    let radius: i64 = 1;
    let here = elevation[y * width + x];
    let mut found: Option<LowerElevation> = None;
    let mut lowest = here;

    for cy in -radius..=radius {
        for cx in -radius..=radius {
            if cx * cx + cy * cy > radius * radius {
                continue;
            }
            let raw_x = x as i64 + cx;
            let raw_y = y as i64 + cy;
            let wrapped = raw_x < 0 || raw_y < 0 || raw_x as usize >= width || raw_y as usize >= height;
            let rx = raw_x.rem_euclid(width as i64) as usize;
            let ry = raw_y.rem_euclid(height as i64) as usize;

            let e = elevation[ry * width + rx];
            if e < lowest {
                lowest = e;
                found = Some(LowerElevation { pos: (rx, ry), wrapped });
            }
        }
    }

    found
}

fn trace_river(
    world: &World,
    seed: (usize, usize),
    rivers: &[Vec<(usize, usize)>],
    lakes: &mut Vec<(usize, usize)>,
) -> Vec<(usize, usize)> {
    let (width, height) = (world.width, world.height);
    let mut path = vec![seed];
    let mut current = seed;

    loop {
        let (x, y) = current;

        if let Some(merged) = merge_into_existing(rivers, width, height, x, y) {
            path.extend(merged);
            return path;
        }

        if world.is_ocean(x, y) {
            return path;
        }

        if let Some(next) = steepest_descent(&world.elevation, width, height, x, y) {
            path.push(next);
            current = next;
            continue;
        }

        match find_lower_elevation(&world.elevation, width, height, x, y) {
            Some(lower) if !lower.wrapped => {
                match astar::find_path(&world.elevation, width, height, current, lower.pos) {
                    Some(result) => {
                        path.extend(result.path);
                        current = *path.last().unwrap();
                    }
                    None => {
                        warn!("erosion: A* exhausted tracing from ({x}, {y}); terminating as lake");
                        lakes.push(current);
                        return path;
                    }
                }
            }
            Some(lower) => {
                if let Some(next) = splice_wrap(world, current, lower.pos) {
                    path.extend(next.0);
                    current = next.1;
                } else {
                    lakes.push(current);
                    return path;
                }
            }
            None => {
                lakes.push(current);
                return path;
            }
        }
    }
}

fn merge_into_existing(
    rivers: &[Vec<(usize, usize)>],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> Option<Vec<(usize, usize)>> {
    for (dx, dy) in [(0_i64, -1_i64), (1, 0), (0, 1), (-1, 0)] {
        let nx = (x as i64 + dx).rem_euclid(width as i64) as usize;
        let ny = (y as i64 + dy).rem_euclid(height as i64) as usize;

        for river in rivers {
            if let Some(i) = river.iter().position(|&c| c == (nx, ny)) {
                return Some(river[i..].to_vec());
            }
        }
    }
    None
}

/// Splice a path across the torus seam: A* to the nearer edge, a single
/// wrap jump, then A* on to the target.
fn splice_wrap(
    world: &World,
    current: (usize, usize),
    target: (usize, usize),
) -> Option<(Vec<(usize, usize)>, (usize, usize))> {
    let (width, height) = (world.width, world.height);
    let (x, y) = (current.0 as i64, current.1 as i64);
    let (lx, ly) = (target.0 as i64, target.1 as i64);

    let wraps_x = !in_circle(SEARCH_MAX_RADIUS, x, y, lx, y);
    let (edge, jump) = if wraps_x {
        let (edge_x, jump_x) = if x - lx < 0 {
            (0, width as i64 - 1)
        } else {
            (width as i64 - 1, 0)
        };
        let edge_y = (y + ly) / 2;
        ((edge_x, edge_y), (jump_x, edge_y))
    } else if !in_circle(SEARCH_MAX_RADIUS, x, y, x, ly) {
        let (edge_y, jump_y) = if y - ly < 0 {
            (0, height as i64 - 1)
        } else {
            (height as i64 - 1, 0)
        };
        let edge_x = (x + lx) / 2;
        ((edge_x, edge_y), (edge_x, jump_y))
    } else {
        return None;
    };

    let edge = (edge.0.clamp(0, width as i64 - 1) as usize, edge.1.clamp(0, height as i64 - 1) as usize);
    let jump = (jump.0.clamp(0, width as i64 - 1) as usize, jump.1.clamp(0, height as i64 - 1) as usize);

    let to_edge = astar::find_path(&world.elevation, width, height, current, edge)?;
    let mut full = to_edge.path;
    full.push(jump);

    let to_target = astar::find_path(&world.elevation, width, height, jump, target)?;
    full.extend(to_target.path);

    let last = *full.last().unwrap();
    Some((full, last))
}

fn in_circle(radius: i64, cx: i64, cy: i64, x: i64, y: i64) -> bool {
    let dx = cx - x;
    let dy = cy - y;
    dx * dx + dy * dy <= radius * radius
}

fn clean_up_flow(world: &mut World, river: &[(usize, usize)]) {
    if river.is_empty() {
        return;
    }
    let width = world.width;
    let mut ceiling = world.elevation[river[0].1 * width + river[0].0];

    for &(x, y) in river.iter() {
        let idx = y * width + x;
        if world.elevation[idx] <= ceiling {
            ceiling = world.elevation[idx];
        } else {
            world.elevation[idx] = ceiling;
        }
    }
}

fn carve_valley(world: &mut World, river: &[(usize, usize)]) {
    let (width, height) = (world.width, world.height);
    let radius: i64 = 2;
    let river_set: HashSet<(usize, usize)> = river.iter().cloned().collect();

    for &(rx, ry) in river {
        let river_elev = world.elevation[ry * width + rx];

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (wx, wy) = (rx as i64 + dx, ry as i64 + dy);
                if wx < 0 || wy < 0 || wx as usize >= width || wy as usize >= height {
                    continue;
                }
                let (wx, wy) = (wx as usize, wy as usize);
                if river_set.contains(&(wx, wy)) {
                    continue;
                }
                if dx.abs().max(dy.abs()) > radius {
                    continue;
                }

                let idx = wy * width + wx;
                if world.elevation[idx] <= river_elev {
                    continue;
                }

                let curve = if dx.abs() == 1 || dy.abs() == 1 { 0.2 } else { 0.05 };
                let diff = river_elev - world.elevation[idx];
                let mut new_elev = world.elevation[idx] + diff * curve;
                if new_elev < river_elev {
                    new_elev = river_elev;
                }
                world.elevation[idx] = new_elev;
            }
        }
    }
}

fn fill_river_map(
    water_flow: &[f32],
    precipitation: &[f32],
    river: &[(usize, usize)],
    river_map: &mut [f32],
    width: usize,
) {
    let mut prev: Option<(usize, usize)> = None;
    for &(x, y) in river {
        let idx = y * width + x;
        if let Some((px, py)) = prev {
            let pidx = py * width + px;
            river_map[idx] = precipitation[idx] + river_map[pidx];
        } else {
            river_map[idx] = water_flow[idx];
        }
        prev = Some((x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    fn sloped_world(width: usize, height: usize) -> World {
        let params = GenerationParams {
            width,
            height,
            ..Default::default()
        };
        // Elevation slopes downward to the right, guaranteeing a
        // deterministic flow direction for every interior cell.
        let elevation: Vec<f32> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (width - x) as f32 + y as f32 * 0.01))
            .collect();
        let mut world = World::new("t".into(), params, elevation, vec![0; width * height]);
        world.ocean = Some(vec![false; width * height]);
        world.ocean.as_mut().unwrap()[width - 1] = true;
        world.mountain_threshold = 0.0;
        world.precipitation = Some(vec![0.1; width * height]);
        world
    }

    #[test]
    fn river_monotone_descent_holds() {
        let mut world = sloped_world(12, 4);
        run(&mut world);

        let river_map = world.river_map.as_ref().unwrap();
        assert_eq!(river_map.len(), 48);
        assert!(river_map.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn clean_up_flow_enforces_monotone_descent() {
        let mut world = sloped_world(6, 3);
        let river = vec![(0, 1), (1, 1), (2, 1)];
        world.elevation[1 * 6 + 0] = 5.0;
        world.elevation[1 * 6 + 1] = 7.0;
        world.elevation[1 * 6 + 2] = 3.0;

        clean_up_flow(&mut world, &river);

        assert!(world.elevation[1 * 6 + 0] >= world.elevation[1 * 6 + 1]);
        assert!(world.elevation[1 * 6 + 1] >= world.elevation[1 * 6 + 2]);
    }
}
