//! Stage 13: biome classification -- a temperature x humidity lookup table.

use log::debug;

use crate::world::{Biome, HumidityBand, TemperatureBand, World};

pub fn run(world: &mut World) {
    let (width, height) = (world.width, world.height);
    debug!("biome: {width}x{height}");

    let mut biome = vec![Biome::Ocean; width * height];
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            biome[idx] = if world.is_ocean(x, y) {
                Biome::Ocean
            } else {
                classify(world.temperature_band(x, y), world.humidity_band(x, y))
            };
        }
    }

    world.biome = Some(biome);
}

fn classify(temperature: TemperatureBand, humidity: HumidityBand) -> Biome {
    use HumidityBand as H;
    use TemperatureBand as T;

    match temperature {
        T::Polar => match humidity {
            H::Superarid => Biome::PolarDesert,
            _ => Biome::Ice,
        },
        T::Alpine => match humidity {
            H::Superarid => Biome::SubpolarDryTundra,
            H::Perarid => Biome::SubpolarMoistTundra,
            H::Arid => Biome::SubpolarWetTundra,
            _ => Biome::SubpolarRainTundra,
        },
        T::Boreal => match humidity {
            H::Superarid => Biome::BorealDesert,
            H::Perarid => Biome::BorealDryScrub,
            H::Arid => Biome::BorealMoistForest,
            H::Semiarid => Biome::BorealWetForest,
            _ => Biome::BorealRainForest,
        },
        T::Cool => match humidity {
            H::Superarid => Biome::CoolTemperateDesert,
            H::Perarid => Biome::CoolTemperateDesertScrub,
            H::Arid => Biome::CoolTemperateSteppe,
            H::Semiarid => Biome::CoolTemperateMoistForest,
            H::Subhumid => Biome::CoolTemperateWetForest,
            _ => Biome::CoolTemperateRainForest,
        },
        T::Warm => match humidity {
            H::Superarid => Biome::WarmTemperateDesert,
            H::Perarid => Biome::WarmTemperateDesertScrub,
            H::Arid => Biome::WarmTemperateThornScrub,
            H::Semiarid => Biome::WarmTemperateDryForest,
            H::Subhumid => Biome::WarmTemperateMoistForest,
            H::Humid => Biome::WarmTemperateWetForest,
            _ => Biome::WarmTemperateRainForest,
        },
        T::Subtropical => match humidity {
            H::Superarid => Biome::SubtropicalDesert,
            H::Perarid => Biome::SubtropicalDesertScrub,
            H::Arid => Biome::SubtropicalThornWoodland,
            H::Semiarid => Biome::SubtropicalDryForest,
            H::Subhumid => Biome::SubtropicalMoistForest,
            H::Humid => Biome::SubtropicalWetForest,
            _ => Biome::SubtropicalRainForest,
        },
        T::Tropical => match humidity {
            H::Superarid => Biome::TropicalDesert,
            H::Perarid => Biome::TropicalDesertScrub,
            H::Arid => Biome::TropicalThornWoodland,
            H::Semiarid => Biome::TropicalVeryDryForest,
            H::Subhumid => Biome::TropicalDryForest,
            H::Humid => Biome::TropicalMoistForest,
            H::Perhumid => Biome::TropicalWetForest,
            H::Superhumid => Biome::TropicalRainForest,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn ocean_cells_are_always_ocean_biome() {
        let params = GenerationParams {
            width: 4,
            height: 4,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![0.0; 16], vec![0; 16]);
        world.ocean = Some(vec![true; 16]);
        world.temperature = Some(vec![0.5; 16]);
        world.humidity = Some(vec![0.5; 16]);

        run(&mut world);

        assert!(world.biome.unwrap().iter().all(|&b| b == Biome::Ocean));
    }

    #[test]
    fn polar_superarid_land_is_polar_desert() {
        let params = GenerationParams {
            width: 1,
            height: 1,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![0.0], vec![0]);
        world.ocean = Some(vec![false]);
        world.temperature = Some(vec![0.0]);
        world.humidity = Some(vec![0.0]);
        world.temperature_thresholds = [0.1, f32::INFINITY, f32::INFINITY, f32::INFINITY, f32::INFINITY, f32::INFINITY, f32::INFINITY];
        world.humidity_thresholds = [0.1, f32::INFINITY, f32::INFINITY, f32::INFINITY, f32::INFINITY, f32::INFINITY, f32::INFINITY, f32::INFINITY];

        run(&mut world);

        assert_eq!(world.biome.unwrap()[0], Biome::PolarDesert);
    }
}
