use anyhow::Result;
use clap::{Parser, ValueEnum};

use worldgen_core::{generate, GenerationLevel, GenerationParams, StubTectonicDriver};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Step {
    Plates,
    Precipitations,
    Full,
}

impl From<Step> for GenerationLevel {
    fn from(step: Step) -> Self {
        match step {
            Step::Plates => GenerationLevel::PlatesOnly,
            Step::Precipitations => GenerationLevel::Precipitations,
            Step::Full => GenerationLevel::Full,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "worldgen", about = "Procedural world generator")]
struct Args {
    /// World name, used only for the debug dump header.
    #[arg(short, long, default_value = "world")]
    name: String,

    /// World seed.
    #[arg(short, long, default_value_t = 0)]
    seed: u32,

    #[arg(long, default_value_t = 512)]
    width: usize,

    #[arg(long, default_value_t = 256)]
    height: usize,

    #[arg(long, default_value_t = 10)]
    num_plates: u16,

    #[arg(long, default_value_t = 1.0)]
    ocean_level: f32,

    /// How far the pipeline should run.
    #[arg(long, value_enum, default_value_t = Step::Full)]
    step: Step,

    #[arg(long, default_value_t = true)]
    fade_borders: bool,

    #[arg(long, default_value_t = true)]
    rivers: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = GenerationParams {
        seed: args.seed,
        width: args.width,
        height: args.height,
        num_plates: args.num_plates,
        ocean_level: args.ocean_level,
        step: args.step.into(),
        fade_borders: args.fade_borders,
        rivers: args.rivers,
        ..Default::default()
    };

    let driver = StubTectonicDriver;
    let world = generate(args.name, params, &driver)?;

    println!("name: {}", world.name);
    println!("size: {}x{}", world.width, world.height);
    println!("generation_level: {:?}", world.generation_level);
    println!(
        "land cells: {}",
        world
            .ocean
            .as_ref()
            .map(|o| o.iter().filter(|&&is_ocean| !is_ocean).count())
            .unwrap_or(world.width * world.height)
    );
    if let Some(rivers) = world.river_map.as_ref() {
        println!("river cells: {}", rivers.iter().filter(|&&v| v > 0.0).count());
    }
    if let Some(biome) = world.biome.as_ref() {
        println!("biome cells classified: {}", biome.len());
    }

    Ok(())
}
