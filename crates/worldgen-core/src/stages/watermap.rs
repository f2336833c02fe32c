//! Stage 9: watermap (Monte-Carlo droplet propagation).

use log::debug;

use crate::quantile::quantile_threshold;
use crate::world::World;

const NUM_SAMPLES: usize = 20_000;

pub fn run(world: &mut World, seed: u32) {
    let (width, height) = (world.width, world.height);
    debug!("watermap: seed={seed}, samples={NUM_SAMPLES}");

    let mut water_map = vec![0.0_f32; width * height];
    let samples = world.random_land(NUM_SAMPLES, seed);

    let precipitation = world.precipitation.clone().unwrap_or_else(|| vec![1.0; width * height]);

    for (x, y) in samples {
        let q = precipitation[y * width + x].max(0.0);
        deposit(world, &mut water_map, x, y, q);
    }

    let ocean_mask = world.ocean.clone();
    world.set_water_threshold(crate::world::WaterThreshold::Creek, quantile_threshold(&water_map, ocean_mask.as_deref(), 0.05));
    world.set_water_threshold(crate::world::WaterThreshold::River, quantile_threshold(&water_map, ocean_mask.as_deref(), 0.02));
    world.set_water_threshold(crate::world::WaterThreshold::MainRiver, quantile_threshold(&water_map, ocean_mask.as_deref(), 0.007));

    world.water_map = Some(water_map);
}

/// Deposit a droplet of quantity `q` at `(x, y)`, recursing into lower
/// neighbors in proportion to a truncated-integer elevation gap.
///
/// The weight is `(pos_elev - neighbor_elev)` truncated to an integer before
/// being shifted left by 2 (i.e. `<< 2`, not a clean `* 4.0`), and the
/// steepest-descent neighbor has its weight bumped from 0 to 1 so it is never
/// silently excluded. Both quirks are load-bearing for the river networks
/// this produces and must not be "fixed".
fn deposit(world: &World, water_map: &mut [f32], x: usize, y: usize, q: f32) {
    if q < 0.0 {
        return;
    }

    let width = world.width;
    let pos_elev = world.elevation_at(x, y) + water_map[y * width + x];

    let mut lower: Vec<((usize, usize), u32)> = Vec::new();
    let mut min_lower = f32::MAX;
    let mut total_lower: u32 = 0;

    for (nx, ny) in world.tiles_around(x, y) {
        let n_elev = world.elevation[ny * width + nx] + water_map[ny * width + nx];
        if n_elev < pos_elev {
            let mut dq = ((pos_elev - n_elev) as u32) << 2;
            if n_elev < min_lower {
                min_lower = n_elev;
                if dq == 0 {
                    dq = 1;
                }
            }
            lower.push(((nx, ny), dq));
            total_lower += dq;
        }
    }

    if lower.is_empty() {
        water_map[y * width + x] += q;
        return;
    }

    let f = q / total_lower as f32;

    for ((nx, ny), dq) in lower {
        if world.is_ocean(nx, ny) {
            continue;
        }
        let ql = f * dq as f32;
        let going = ql > 0.05;
        water_map[ny * width + nx] += ql;
        if going {
            deposit(world, water_map, nx, ny, ql);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn completes_over_all_ocean_with_no_land() {
        let params = GenerationParams {
            width: 16,
            height: 8,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![0.0; 128], vec![0; 128]);
        world.ocean = Some(vec![true; 128]);

        run(&mut world, 5);

        let water_map = world.water_map.unwrap();
        assert_eq!(water_map.len(), 128);
    }
}
