//! Stage 2: land centering.
//!
//! Torus-rotates the grid so the globally lowest elevation row and column
//! sit at the top-left, matching the original's "put the ugly seam where
//! nobody will render it" convention.

use log::debug;

use crate::world::World;

pub fn run(world: &mut World) {
    let (width, height) = (world.width, world.height);

    let mut row_sums = vec![0.0_f64; height];
    let mut col_sums = vec![0.0_f64; width];
    for y in 0..height {
        for x in 0..width {
            let e = world.elevation_at(x, y) as f64;
            row_sums[y] += e;
            col_sums[x] += e;
        }
    }

    let y_star = row_sums
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let x_star = col_sums
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);

    debug!("centering: rotating by (x*={x_star}, y*={y_star})");

    world.elevation = rotate(&world.elevation, width, height, x_star, y_star);
    world.plates = rotate(&world.plates, width, height, x_star, y_star);
}

fn rotate<T: Copy>(data: &[T], width: usize, height: usize, x_star: usize, y_star: usize) -> Vec<T> {
    let mut out = data.to_vec();
    for y in 0..height {
        for x in 0..width {
            let src_x = (x + x_star) % width;
            let src_y = (y + y_star) % height;
            out[y * width + x] = data[src_y * width + src_x];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn lowest_row_and_column_move_to_origin() {
        let params = GenerationParams {
            width: 4,
            height: 4,
            ..Default::default()
        };
        // Row 2 and column 3 are the lowest.
        let mut elevation = vec![5.0; 16];
        for x in 0..4 {
            elevation[2 * 4 + x] -= 1.0;
        }
        for y in 0..4 {
            elevation[y * 4 + 3] -= 1.0;
        }
        let mut world = World::new("t".into(), params, elevation, vec![0; 16]);

        run(&mut world);

        assert_eq!(world.elevation_at(0, 0), 3.0);
    }
}
