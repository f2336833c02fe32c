//! The generation pipeline: the fixed stage order driving a fresh `World`
//! from a seed to a fully classified grid.
//!
//! Stage order and seed fan-out are both fixed contracts (see `rng.rs`);
//! reordering either changes every world generated downstream of it.

use log::{debug, info};

use crate::error::Result;
use crate::rng::{PrePipelineSeeds, StageSeeds};
use crate::stages::{
    biome, border_fade, centering, elevation_noise, erosion, humidity, icecap, irrigation, ocean,
    permeability, precipitation, temperature, watermap,
};
use crate::tectonic::TectonicDriver;
use crate::world::{GenerationLevel, GenerationParams, World};

/// Run the full pipeline for `params` against `driver`, stopping at
/// `params.step`.
pub fn generate(name: impl Into<String>, params: GenerationParams, driver: &dyn TectonicDriver) -> Result<World> {
    let name = name.into();
    info!("generate: {name} seed={} {}x{}", params.seed, params.width, params.height);

    let pre_seeds = PrePipelineSeeds::derive(params.seed);
    let stage_seeds = StageSeeds::derive(pre_seeds.post_plate_noise);

    let (elevation, plates) = driver.generate(&params)?;
    let mut world = World::new(name, params, elevation, plates);

    // 2. Land centering.
    centering::run(&mut world);

    // 3. Elevation noise.
    elevation_noise::run(&mut world, pre_seeds.elevation_noise);

    // 4. Border fade (optional).
    if world.params.fade_borders {
        border_fade::run(&mut world);
    }

    // 5. Ocean/threshold init.
    ocean::run(&mut world);

    world.generation_level = GenerationLevel::PlatesOnly;
    if world.params.step == GenerationLevel::PlatesOnly {
        debug!("generate: stopping after PlatesOnly");
        return Ok(world);
    }

    // 6. Temperature.
    temperature::run(&mut world, stage_seeds.temperature);

    // 7. Precipitation.
    precipitation::run(&mut world, stage_seeds.precipitation);

    world.generation_level = GenerationLevel::Precipitations;
    if world.params.step == GenerationLevel::Precipitations {
        debug!("generate: stopping after Precipitations");
        return Ok(world);
    }

    // 8. Erosion, gated by the rivers flag.
    if world.params.rivers {
        erosion::run(&mut world);
    }

    // 9. Watermap.
    watermap::run(&mut world, stage_seeds.watermap);

    // 10. Irrigation.
    irrigation::run(&mut world);

    // 11. Humidity.
    humidity::run(&mut world);

    // 12. Permeability.
    permeability::run(&mut world, stage_seeds.permeability);

    // 13. Biome.
    biome::run(&mut world);

    // 14. Icecap.
    icecap::run(&mut world, stage_seeds.icecap);

    world.generation_level = GenerationLevel::Full;
    info!("generate: {} complete", world.name);

    Ok(world)
}
