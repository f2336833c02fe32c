//! Stage 3: elevation noise -- layer simplex noise onto the raw tectonic
//! heightmap to break up artifacts from the plate driver's interpolation.

use log::debug;
use noise::OpenSimplex;

use crate::noise_field::layered_noise;
use crate::world::World;

const OCTAVES: u32 = 8;
const BASE_FREQ: f64 = 16.0;

pub fn run(world: &mut World, seed: u32) {
    let (width, height) = (world.width, world.height);
    debug!("elevation_noise: seed={seed}");

    let noise = OpenSimplex::new(seed);
    let n_scale = 1024.0 / height.max(1) as f64;

    for y in 0..height {
        for x in 0..width {
            let n = layered_noise(&noise, x as f64 * n_scale, y as f64 * n_scale, OCTAVES, BASE_FREQ);
            world.elevation[y * width + x] += n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn adds_finite_noise_to_every_cell() {
        let params = GenerationParams {
            width: 16,
            height: 16,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![1.0; 256], vec![0; 256]);

        run(&mut world, 3);

        assert!(world.elevation.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn same_seed_is_deterministic() {
        let params = GenerationParams {
            width: 8,
            height: 8,
            ..Default::default()
        };
        let mut a = World::new("t".into(), params.clone(), vec![1.0; 64], vec![0; 64]);
        let mut b = World::new("t".into(), params, vec![1.0; 64], vec![0; 64]);

        run(&mut a, 9);
        run(&mut b, 9);

        assert_eq!(a.elevation, b.elevation);
    }
}
