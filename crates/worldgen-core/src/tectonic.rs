//! The plate-tectonics driver seam.
//!
//! The real plate simulation is an external collaborator: create/step/
//! is_finished/heightmap/platesmap/destroy in the source's handle-based API.
//! Rust has no need to reproduce a handle lifecycle for an in-process call,
//! so the whole exchange collapses to one `generate` call returning the two
//! row-major buffers the rest of the pipeline consumes.

use rand::Rng;

use crate::error::{Result, WorldgenError};
use crate::world::GenerationParams;

/// Implemented by whatever supplies the initial heightmap and plate
/// assignment for a seed/size/plate-count combination.
pub trait TectonicDriver {
    fn generate(&self, params: &GenerationParams) -> Result<(Vec<f32>, Vec<u16>)>;
}

/// A deterministic stand-in tectonic driver: seeded midpoint-displacement
/// heightmap plus a Voronoi plate assignment from random seed points. Not a
/// faithful plate-tectonics simulation -- it exists so the pipeline runs and
/// tests reproducibly without the real external driver, which is out of
/// scope here.
pub struct StubTectonicDriver;

impl TectonicDriver for StubTectonicDriver {
    fn generate(&self, params: &GenerationParams) -> Result<(Vec<f32>, Vec<u16>)> {
        let (width, height) = (params.width, params.height);
        if width == 0 || height == 0 {
            return Err(WorldgenError::Configuration(
                "width and height must be non-zero".into(),
            ));
        }

        let mut rng = crate::rng::rng_from_seed(params.seed);
        let elevation = midpoint_displacement(&mut rng, width, height);
        let plates = voronoi_plates(&mut rng, width, height, params.num_plates.max(1));

        Ok((elevation, plates))
    }
}

fn midpoint_displacement(rng: &mut impl Rng, width: usize, height: usize) -> Vec<f32> {
    // Diamond-square needs a square power-of-two-plus-one grid; generate at
    // that resolution and resample (nearest) onto the requested size.
    let size = width.max(height).next_power_of_two().max(2) + 1;
    let mut grid = vec![0.0_f32; size * size];
    let at = |g: &[f32], x: usize, y: usize| g[y * size + x];
    let set = |g: &mut [f32], x: usize, y: usize, v: f32| g[y * size + x] = v;

    set(&mut grid, 0, 0, rng.gen_range(0.0..1.0));
    set(&mut grid, size - 1, 0, rng.gen_range(0.0..1.0));
    set(&mut grid, 0, size - 1, rng.gen_range(0.0..1.0));
    set(&mut grid, size - 1, size - 1, rng.gen_range(0.0..1.0));

    let mut step = size - 1;
    let mut roughness = 0.6_f32;
    while step > 1 {
        let half = step / 2;

        // diamond
        let mut y = half;
        while y < size {
            let mut x = half;
            while x < size {
                let avg = (at(&grid, x - half, y - half)
                    + at(&grid, x + half, y - half)
                    + at(&grid, x - half, y + half)
                    + at(&grid, x + half, y + half))
                    / 4.0;
                let jitter = (rng.gen_range(-0.5..0.5)) * roughness;
                set(&mut grid, x, y, (avg + jitter).clamp(0.0, 1.0));
                x += step;
            }
            y += step;
        }

        // square
        let mut y = 0;
        while y < size {
            let mut x = (y / half % 2) * half;
            while x < size {
                let mut sum = 0.0;
                let mut count = 0;
                for (dx, dy) in [(-(half as i64), 0), (half as i64, 0), (0, -(half as i64)), (0, half as i64)] {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx >= 0 && ny >= 0 && (nx as usize) < size && (ny as usize) < size {
                        sum += at(&grid, nx as usize, ny as usize);
                        count += 1;
                    }
                }
                let avg = sum / count as f32;
                let jitter = (rng.gen_range(-0.5..0.5)) * roughness;
                set(&mut grid, x, y, (avg + jitter).clamp(0.0, 1.0));
                x += step;
            }
            y += half;
        }

        step = half;
        roughness *= 0.55;
    }

    (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                let sx = (x * (size - 1)) / width.max(1);
                let sy = (y * (size - 1)) / height.max(1);
                (sx, sy)
            })
        })
        .map(|(sx, sy)| at(&grid, sx.min(size - 1), sy.min(size - 1)))
        .collect()
}

fn voronoi_plates(rng: &mut impl Rng, width: usize, height: usize, num_plates: u16) -> Vec<u16> {
    let seeds: Vec<(f32, f32)> = (0..num_plates)
        .map(|_| (rng.gen_range(0.0..width as f32), rng.gen_range(0.0..height as f32)))
        .collect();

    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            seeds
                .iter()
                .enumerate()
                .map(|(i, &(sx, sy))| {
                    let dx = x as f32 - sx;
                    let dy = y as f32 - sy;
                    (i as u16, dx * dx + dy * dy)
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_driver_is_deterministic() {
        let params = GenerationParams {
            width: 16,
            height: 16,
            seed: 42,
            num_plates: 4,
            ..Default::default()
        };
        let (e1, p1) = StubTectonicDriver.generate(&params).unwrap();
        let (e2, p2) = StubTectonicDriver.generate(&params).unwrap();
        assert_eq!(e1, e2);
        assert_eq!(p1, p2);
        assert_eq!(e1.len(), 256);
        assert!(p1.iter().all(|&p| p < 4));
    }

    #[test]
    fn rejects_zero_size() {
        let params = GenerationParams {
            width: 0,
            height: 16,
            ..Default::default()
        };
        assert!(StubTectonicDriver.generate(&params).is_err());
    }
}
