//! Procedural world generation: a deterministic pipeline from a seed and a
//! tectonic driver to a grid of elevation, climate, hydrology, and biome
//! layers.

pub mod astar;
pub mod error;
pub mod noise_field;
pub mod pipeline;
pub mod quantile;
pub mod rng;
pub mod stages;
pub mod tectonic;
pub mod world;

pub use error::{Result, WorldgenError};
pub use pipeline::generate;
pub use tectonic::{StubTectonicDriver, TectonicDriver};
pub use world::{GenerationLevel, GenerationParams, World};
