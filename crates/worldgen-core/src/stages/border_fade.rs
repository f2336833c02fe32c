//! Stage 4: border fade -- optionally pull elevation toward zero near the
//! map edges so the torus seam reads as ocean rather than a visible cliff.

use log::debug;

use crate::world::World;

pub fn run(world: &mut World) {
    let (width, height) = (world.width, world.height);
    let border = 30.min((width / 5).max(height / 5));
    debug!("border_fade: border={border}");

    if border == 0 {
        return;
    }

    for x in 0..width {
        for i in 0..border {
            fade(&mut world.elevation, width, x, i, i as f32, border as f32);
            if height > i + 1 {
                fade(&mut world.elevation, width, x, height - i - 1, i as f32, border as f32);
            }
        }
    }

    for y in 0..height {
        for i in 0..border {
            fade(&mut world.elevation, width, i, y, i as f32, border as f32);
            if width > i + 1 {
                fade(&mut world.elevation, width, width - i - 1, y, i as f32, border as f32);
            }
        }
    }
}

fn fade(elevation: &mut [f32], width: usize, x: usize, y: usize, i: f32, border: f32) {
    let idx = y * width + x;
    elevation[idx] = elevation[idx] * i / border;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn corner_cell_is_fully_zeroed() {
        let params = GenerationParams {
            width: 40,
            height: 40,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![10.0; 1600], vec![0; 1600]);

        run(&mut world);

        assert_eq!(world.elevation_at(0, 0), 0.0);
    }

    #[test]
    fn interior_is_untouched() {
        let params = GenerationParams {
            width: 100,
            height: 100,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![10.0; 10_000], vec![0; 10_000]);

        run(&mut world);

        assert_eq!(world.elevation_at(50, 50), 10.0);
    }
}
