//! Stage 14: icecap -- stochastic freezing of cold ocean cells, biased by
//! already-frozen neighbors.

use log::debug;
use rand::Rng;

use crate::noise_field::interpolate;
use crate::world::{TemperatureBand, World};

const MAX_FREEZE_PERCENTAGE: f32 = 0.6;
const FREEZE_CHANCE_WINDOW: f32 = 0.2;
const SURROUNDING_TILE_INFLUENCE: f32 = 0.5;

pub fn run(world: &mut World, seed: u32) {
    let (width, height) = (world.width, world.height);
    debug!("icecap: seed={seed}");

    let temperature = world
        .temperature
        .as_ref()
        .expect("temperature must run before icecap")
        .clone();
    let ocean = world
        .ocean
        .as_ref()
        .expect("ocean must run before icecap")
        .clone();

    let min_t = temperature.iter().cloned().fold(f32::INFINITY, f32::min);
    let freeze_limit = world.get_temperature_threshold(TemperatureBand::Polar);
    let freeze_threshold = (freeze_limit - min_t) * MAX_FREEZE_PERCENTAGE;
    let certain = freeze_threshold * (1.0 - FREEZE_CHANCE_WINDOW);

    let mut solid: Vec<bool> = (0..width * height)
        .map(|i| !ocean[i] || temperature[i] <= min_t + certain)
        .collect();

    let freeze_points = [
        (min_t, 1.0),
        (min_t + certain, 1.0),
        (min_t + freeze_threshold, 0.0),
    ];
    let chance_points = [(0.0, -1.0), (8.0, 1.0)];

    let mut rng = crate::rng::rng_from_seed(seed);
    let mut icecap = vec![0.0_f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if !ocean[idx] {
                continue;
            }
            let t = temperature[idx];
            if t - min_t >= freeze_threshold {
                continue;
            }

            let mut chance = interpolate(t, &freeze_points);

            if x > 0 && y > 0 && x < width - 1 && y < height - 1 {
                let mut frozen = 0u32;
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        if (nx, ny) != (x, y) && solid[ny * width + nx] {
                            frozen += 1;
                        }
                    }
                }
                let chance_mod = interpolate(frozen as f32, &chance_points);
                chance += chance_mod * SURROUNDING_TILE_INFLUENCE;
            }

            let draw: f32 = rng.gen_range(0.0..=1.0);
            if draw <= chance {
                solid[idx] = true;
                icecap[idx] = freeze_threshold - (t - min_t);
            }
        }
    }

    world.icecap = Some(icecap);
}
