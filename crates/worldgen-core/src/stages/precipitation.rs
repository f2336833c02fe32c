//! Stage 7: precipitation.
//!
//! Layered noise shaped by a gamma curve of normalized temperature, then
//! renormalized to `[-1, 1]`.

use log::debug;
use noise::OpenSimplex;

use crate::noise_field::layered_with_wrap_blend;
use crate::quantile::quantile_threshold;
use crate::world::{PrecipitationBand, World};

const OCTAVES: u32 = 8;
const BASE_FREQ: f64 = 64.0;

pub fn run(world: &mut World, seed: u32) {
    let (width, height) = (world.width, world.height);
    debug!("precipitation: seed={seed}");

    let noise = OpenSimplex::new(seed);
    let n_scale = 1024.0 / height as f64;

    let mut raw = vec![0.0_f32; width * height];
    for y in 0..height {
        for x in 0..width {
            raw[y * width + x] = layered_with_wrap_blend(&noise, x, y, width, OCTAVES, BASE_FREQ, n_scale);
        }
    }

    let temperature = world
        .temperature
        .as_ref()
        .expect("temperature must run before precipitation");
    let (t_min, t_max) = min_max(temperature);
    let (p_min, p_max) = min_max(&raw);

    let gamma = world.params.gamma;
    let beta = world.params.gamma_offset;

    let mut precipitation = vec![0.0_f32; width * height];
    for i in 0..precipitation.len() {
        let t_hat = normalize(temperature[i], t_min, t_max);
        let p_hat = normalize(raw[i], p_min, p_max);
        let curve = t_hat.powf(gamma) * (1.0 - beta) + beta;
        precipitation[i] = p_hat * curve;
    }

    renormalize_to_range(&mut precipitation, -1.0, 1.0);

    let ocean_mask = world.ocean.clone();
    let low = quantile_threshold(&precipitation, ocean_mask.as_deref(), 0.75);
    let medium = quantile_threshold(&precipitation, ocean_mask.as_deref(), 0.3);
    world.set_precipitation_threshold(PrecipitationBand::Low, low);
    world.set_precipitation_threshold(PrecipitationBand::Medium, medium);
    world.set_precipitation_threshold(PrecipitationBand::High, 0.0);

    world.precipitation = Some(precipitation);
}

fn min_max(values: &[f32]) -> (f32, f32) {
    let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    (min, max)
}

fn normalize(v: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range <= f32::EPSILON {
        0.0
    } else {
        (v - min) / range
    }
}

fn renormalize_to_range(values: &mut [f32], lo: f32, hi: f32) {
    let (min, max) = min_max(values);
    let range = max - min;
    if range <= f32::EPSILON {
        return;
    }
    for v in values.iter_mut() {
        *v = lo + (*v - min) / range * (hi - lo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn renormalizes_into_expected_range() {
        let params = GenerationParams {
            width: 16,
            height: 16,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![0.0; 256], vec![0; 256]);
        world.ocean = Some(vec![false; 256]);
        world.temperature = Some(vec![0.5; 256]);

        run(&mut world, 3);

        let p = world.precipitation.as_ref().unwrap();
        assert!(p.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(
            world.get_precipitation_threshold(PrecipitationBand::High),
            0.0
        );
    }
}
