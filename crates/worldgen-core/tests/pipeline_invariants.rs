//! Cross-stage invariants and the concrete scenarios a generated world must
//! satisfy end to end.

use worldgen_core::world::{GenerationParams, World};
use worldgen_core::{generate, GenerationLevel, StubTectonicDriver};

fn small_world(seed: u32, width: usize, height: usize, num_plates: u16) -> World {
    let params = GenerationParams {
        seed,
        width,
        height,
        num_plates,
        ..Default::default()
    };
    generate("t", params, &StubTectonicDriver).expect("generation should succeed")
}

#[test]
fn smoke_world_has_every_layer_and_at_least_one_land_cell() {
    let world = small_world(1, 32, 16, 1);

    assert_eq!(world.generation_level, GenerationLevel::Full);
    assert_eq!(world.elevation.len(), 32 * 16);
    assert!(world.elevation.iter().all(|e| e.is_finite()));

    let layers_present = world.ocean.is_some()
        && world.sea_depth.is_some()
        && world.temperature.is_some()
        && world.precipitation.is_some()
        && world.permeability.is_some()
        && world.irrigation.is_some()
        && world.water_map.is_some()
        && world.river_map.is_some()
        && world.lake_map.is_some()
        && world.humidity.is_some()
        && world.icecap.is_some()
        && world.biome.is_some();
    assert!(layers_present);

    let land = world.ocean.as_ref().unwrap().iter().filter(|&&o| !o).count();
    assert!(land >= 1);
}

#[test]
fn ocean_cells_are_all_reachable_from_a_border_cell() {
    let world = small_world(7, 48, 32, 4);
    let (width, height) = (world.width, world.height);
    let ocean = world.ocean.as_ref().unwrap();

    let mut visited = vec![false; width * height];
    let mut queue = std::collections::VecDeque::new();
    for x in 0..width {
        for &y in &[0, height - 1] {
            if ocean[y * width + x] && !visited[y * width + x] {
                visited[y * width + x] = true;
                queue.push_back((x, y));
            }
        }
    }
    for y in 0..height {
        for &x in &[0, width - 1] {
            if ocean[y * width + x] && !visited[y * width + x] {
                visited[y * width + x] = true;
                queue.push_back((x, y));
            }
        }
    }
    while let Some((x, y)) = queue.pop_front() {
        let (ix, iy) = (x as i64, y as i64);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (ix + dx, iy + dy);
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                let idx = ny * width + nx;
                if ocean[idx] && !visited[idx] {
                    visited[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    for i in 0..width * height {
        if ocean[i] {
            assert!(visited[i], "ocean cell {i} is not reachable from any border cell");
        }
    }
}

#[test]
fn mountain_predicate_matches_definition() {
    let world = small_world(3, 40, 40, 5);
    for y in 0..world.height {
        for x in 0..world.width {
            let expected = !world.is_ocean(x, y) && world.elevation_at(x, y) > world.mountain_threshold;
            assert_eq!(world.is_mountain(x, y), expected);
        }
    }
}

#[test]
fn temperature_band_is_first_threshold_strictly_exceeded() {
    use worldgen_core::world::{TemperatureBand, TEMPERATURE_BANDS};

    let world = small_world(5, 24, 24, 2);
    for y in 0..world.height {
        for x in 0..world.width {
            let t = world.temperature.as_ref().unwrap()[y * world.width + x];
            let mut expected = TemperatureBand::Tropical;
            for band in TEMPERATURE_BANDS {
                if world.get_temperature_threshold(band) > t {
                    expected = band;
                    break;
                }
            }
            assert_eq!(world.temperature_band(x, y), expected);
        }
    }
}

#[test]
fn sea_depth_stays_in_unit_range_and_zero_on_land() {
    let world = small_world(9, 30, 30, 3);
    let depth = world.sea_depth.as_ref().unwrap();
    let ocean = world.ocean.as_ref().unwrap();
    for i in 0..depth.len() {
        assert!((0.0..=1.0).contains(&depth[i]));
        if !ocean[i] {
            assert_eq!(depth[i], 0.0);
        }
    }
}

#[test]
fn random_land_sampling_excludes_ocean_cells() {
    let width = 100;
    let height = 90;
    let params = GenerationParams {
        width,
        height,
        ..Default::default()
    };
    let mut world = World::new("t".into(), params, vec![0.0; width * height], vec![0; width * height]);
    let ocean: Vec<bool> = (0..height)
        .flat_map(|y| (0..width).map(move |x| y >= x))
        .collect();
    world.ocean = Some(ocean);

    let samples = world.random_land(1000, 0);

    assert_eq!(samples.len(), 1000);
    for (x, y) in samples {
        assert!(!world.is_ocean(x, y));
    }
}

#[test]
fn watermap_completes_over_all_ocean_world() {
    let params = GenerationParams {
        width: 16,
        height: 8,
        ..Default::default()
    };
    let mut world = World::new("t".into(), params, vec![0.0; 128], vec![0; 128]);
    world.ocean = Some(vec![true; 128]);
    world.precipitation = Some(vec![0.5; 128]);

    worldgen_core::stages::watermap::run(&mut world, 11);

    let water_map = world.water_map.unwrap();
    assert_eq!(water_map.len(), 128);
}

#[test]
fn generation_is_deterministic_across_runs() {
    let a = small_world(1234, 20, 20, 3);
    let b = small_world(1234, 20, 20, 3);

    assert_eq!(a.elevation, b.elevation);
    assert_eq!(a.plates, b.plates);
    assert_eq!(a.temperature, b.temperature);
    assert_eq!(a.biome, b.biome);
}
