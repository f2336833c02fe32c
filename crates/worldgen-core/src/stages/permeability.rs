//! Stage 12: permeability -- plain layered noise, no wrap-blend or
//! latitude shaping.

use log::debug;
use noise::OpenSimplex;

use crate::noise_field::layered_noise;
use crate::quantile::quantile_threshold;
use crate::world::{PermeabilityBand, World};

const OCTAVES: u32 = 6;
const BASE_FREQ: f64 = 64.0;

pub fn run(world: &mut World, seed: u32) {
    let (width, height) = (world.width, world.height);
    debug!("permeability: seed={seed}");

    let noise = OpenSimplex::new(seed);

    let mut permeability = vec![0.0_f32; width * height];
    for y in 0..height {
        for x in 0..width {
            permeability[y * width + x] = layered_noise(&noise, x as f64, y as f64, OCTAVES, BASE_FREQ);
        }
    }

    let ocean_mask = world.ocean.clone();
    let low = quantile_threshold(&permeability, ocean_mask.as_deref(), 0.75);
    let medium = quantile_threshold(&permeability, ocean_mask.as_deref(), 0.25);
    world.set_permeability_threshold(PermeabilityBand::Low, low);
    world.set_permeability_threshold(PermeabilityBand::Medium, medium);
    world.set_permeability_threshold(PermeabilityBand::High, f32::INFINITY);

    world.permeability = Some(permeability);
}
