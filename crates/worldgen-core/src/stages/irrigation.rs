//! Stage 10: irrigation -- log-distance spreading of the water map from
//! ocean cells onto adjacent land.

use log::debug;

use crate::world::World;

const RADIUS: i64 = 10;

pub fn run(world: &mut World) {
    let (width, height) = (world.width, world.height);
    debug!("irrigation: radius={RADIUS}");

    let kernel = build_kernel(RADIUS);
    let water_map = world.water_map.clone().expect("watermap must run before irrigation");
    let ocean = world.ocean.clone().expect("ocean must be initialized before irrigation");

    let mut irrigation = vec![0.0_f32; width * height];
    let side = (2 * RADIUS + 1) as usize;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if !ocean[idx] {
                continue;
            }
            let source = water_map[idx];

            for dy in -RADIUS..=RADIUS {
                for dx in -RADIUS..=RADIUS {
                    let (tx, ty) = (x as i64 + dx, y as i64 + dy);
                    if tx < 0 || ty < 0 || tx as usize >= width || ty as usize >= height {
                        continue;
                    }
                    let k = kernel[(dy + RADIUS) as usize * side + (dx + RADIUS) as usize];
                    irrigation[ty as usize * width + tx as usize] += source / k;
                }
            }
        }
    }

    world.irrigation = Some(irrigation);
}

fn build_kernel(radius: i64) -> Vec<f32> {
    let side = (2 * radius + 1) as usize;
    let mut kernel = vec![0.0_f32; side * side];
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            let value = (dist + 1.0).ln() + 1.0;
            kernel[(dy + radius) as usize * side + (dx + radius) as usize] = value;
        }
    }
    kernel
}
