//! Stage 6: temperature.
//!
//! Latitude banding modulated by noise, distance-to-sun, axial tilt, and an
//! altitude falloff above the mountain threshold.

use log::debug;
use noise::OpenSimplex;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::noise_field::{interpolate, layered_with_wrap_blend};
use crate::quantile::quantile_threshold;
use crate::world::{TemperatureBand, World, TEMPERATURE_BANDS};

const DISTANCE_TO_SUN_HWHM: f32 = 0.12;
const AXIAL_TILT_HWHM: f32 = 0.07;
const SQRT_2XLN2: f32 = 1.1774100225; // sqrt(2 * ln 2)
const OCTAVES: u32 = 8;
const BASE_FREQ: f64 = 16.0;

fn hwhm_to_sigma(hwhm: f32) -> f32 {
    hwhm / SQRT_2XLN2
}

pub fn run(world: &mut World, seed: u32) {
    let (width, height) = (world.width, world.height);
    debug!("temperature: seed={seed}");

    let mut rng = crate::rng::rng_from_seed(seed);
    let distance_to_sun = draw_distance_to_sun(&mut rng);
    let axial_tilt = draw_axial_tilt(&mut rng);
    debug!("temperature: distance_to_sun={distance_to_sun}, axial_tilt={axial_tilt}");

    let noise = OpenSimplex::new(seed);
    let n_scale = 1024.0 / height as f64;
    let mountain = world.mountain_threshold;

    let mut temperature = vec![0.0_f32; width * height];
    for y in 0..height {
        let norm_y = y as f32 / height.max(1) as f32 - 0.5;
        let tent = [
            (axial_tilt - 0.5, 0.0),
            (axial_tilt, 1.0),
            (axial_tilt + 0.5, 0.0),
        ];
        let latitude_factor = interpolate(norm_y, &tent);

        for x in 0..width {
            let n = layered_with_wrap_blend(&noise, x, y, width, OCTAVES, BASE_FREQ, n_scale);
            let mut t = (latitude_factor * 12.0 + n) / 13.0 / distance_to_sun;

            let elevation = world.elevation_at(x, y);
            if elevation > mountain {
                if elevation > mountain + 29.0 {
                    t *= 0.033;
                } else {
                    t *= 1.0 - (elevation - mountain) / 30.0;
                }
            }

            temperature[y * width + x] = t;
        }
    }

    let ocean_mask = world.ocean.clone();
    for (i, breakpoint) in world.params.temp_breakpoints.iter().enumerate() {
        let band = TEMPERATURE_BANDS[i];
        if band == TemperatureBand::Tropical {
            continue;
        }
        let threshold = quantile_threshold(&temperature, ocean_mask.as_deref(), *breakpoint);
        world.set_temperature_threshold(band, threshold);
    }
    world.set_temperature_threshold(TemperatureBand::Tropical, f32::INFINITY);

    world.temperature = Some(temperature);
}

fn draw_distance_to_sun(rng: &mut ChaCha8Rng) -> f32 {
    let dist = Normal::new(1.0_f32, hwhm_to_sigma(DISTANCE_TO_SUN_HWHM)).unwrap();
    let v: f32 = dist.sample(rng).max(0.1);
    v * v
}

fn draw_axial_tilt(rng: &mut ChaCha8Rng) -> f32 {
    let dist = Normal::new(0.0_f32, hwhm_to_sigma(AXIAL_TILT_HWHM)).unwrap();
    let v: f32 = dist.sample(rng);
    v.clamp(-0.5, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn produces_finite_temperatures_and_tropical_catch_all() {
        let params = GenerationParams {
            width: 16,
            height: 16,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![0.0; 256], vec![0; 256]);
        world.ocean = Some(vec![false; 256]);
        world.mountain_threshold = 10.0;

        run(&mut world, 7);

        let temps = world.temperature.as_ref().unwrap();
        assert!(temps.iter().all(|t| t.is_finite()));
        assert_eq!(
            world.get_temperature_threshold(TemperatureBand::Tropical),
            f32::INFINITY
        );
    }
}
