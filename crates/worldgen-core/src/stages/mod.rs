pub mod biome;
pub mod border_fade;
pub mod centering;
pub mod elevation_noise;
pub mod erosion;
pub mod humidity;
pub mod icecap;
pub mod irrigation;
pub mod ocean;
pub mod permeability;
pub mod precipitation;
pub mod temperature;
pub mod watermap;
