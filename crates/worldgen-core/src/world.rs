//! The world aggregate: grid layers, threshold tables, and the derived
//! queries every stage and consumer reads through.

use serde::{Deserialize, Serialize};

/// How far generation has progressed. Later stages are skipped once a run
/// is requested to stop at an earlier level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GenerationLevel {
    PlatesOnly,
    Precipitations,
    Full,
}

/// Every value the original CLI exposes as a flag, with the defaults that
/// make saved worlds reproducible across implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub seed: u32,
    pub width: usize,
    pub height: usize,
    pub num_plates: u16,
    pub ocean_level: f32,
    pub step: GenerationLevel,
    pub fade_borders: bool,
    pub rivers: bool,
    pub gamma: f32,
    pub gamma_offset: f32,
    pub temp_breakpoints: [f32; 6],
    pub humidity_breakpoints: [f32; 7],
    pub sea_level: f32,
    pub erosion_period: u32,
    pub folding_ratio: f32,
    pub aggr_overlap_abs: f32,
    pub aggr_overlap_rel: f32,
    pub cycle_count: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 512,
            height: 256,
            num_plates: 10,
            ocean_level: 1.0,
            step: GenerationLevel::Full,
            fade_borders: true,
            rivers: true,
            gamma: 1.25,
            gamma_offset: 0.2,
            temp_breakpoints: [0.126, 0.235, 0.406, 0.561, 0.634, 0.876],
            humidity_breakpoints: [0.059, 0.222, 0.493, 0.764, 0.927, 0.986, 0.998],
            sea_level: 0.65,
            erosion_period: 60,
            folding_ratio: 0.02,
            aggr_overlap_abs: 1_000_000.0,
            aggr_overlap_rel: 0.33,
            cycle_count: 2,
        }
    }
}

/// Minimum and maximum seeds accepted by the CLI surface.
pub const MIN_SEED: u32 = 0;
pub const MAX_SEED: u32 = 65535;

/// A dense row-major `height x width` grid of `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid<T> {
    data: Vec<T>,
    pub width: usize,
    pub height: usize,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }
}

impl<T> Grid<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), width * height, "grid data length mismatch");
        Self { data, width, height }
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[y * self.width + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * self.width + x] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElevationThreshold {
    Sea,
    Hill,
    Mountain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureBand {
    Polar,
    Alpine,
    Boreal,
    Cool,
    Warm,
    Subtropical,
    Tropical,
}

pub const TEMPERATURE_BANDS: [TemperatureBand; 7] = [
    TemperatureBand::Polar,
    TemperatureBand::Alpine,
    TemperatureBand::Boreal,
    TemperatureBand::Cool,
    TemperatureBand::Warm,
    TemperatureBand::Subtropical,
    TemperatureBand::Tropical,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HumidityBand {
    Superarid,
    Perarid,
    Arid,
    Semiarid,
    Subhumid,
    Humid,
    Perhumid,
    Superhumid,
}

pub const HUMIDITY_BANDS: [HumidityBand; 8] = [
    HumidityBand::Superarid,
    HumidityBand::Perarid,
    HumidityBand::Arid,
    HumidityBand::Semiarid,
    HumidityBand::Subhumid,
    HumidityBand::Humid,
    HumidityBand::Perhumid,
    HumidityBand::Superhumid,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrecipitationBand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermeabilityBand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterThreshold {
    Creek,
    River,
    MainRiver,
}

/// 40 land biomes plus `Ocean`; `Sea` is reachable only through
/// `biome_group`, never assigned directly by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Sea,
    PolarDesert,
    Ice,
    SubpolarDryTundra,
    SubpolarMoistTundra,
    SubpolarWetTundra,
    SubpolarRainTundra,
    BorealDesert,
    BorealDryScrub,
    BorealMoistForest,
    BorealWetForest,
    BorealRainForest,
    CoolTemperateDesert,
    CoolTemperateDesertScrub,
    CoolTemperateSteppe,
    CoolTemperateMoistForest,
    CoolTemperateWetForest,
    CoolTemperateRainForest,
    WarmTemperateDesert,
    WarmTemperateDesertScrub,
    WarmTemperateThornScrub,
    WarmTemperateDryForest,
    WarmTemperateMoistForest,
    WarmTemperateWetForest,
    WarmTemperateRainForest,
    SubtropicalDesert,
    SubtropicalDesertScrub,
    SubtropicalThornWoodland,
    SubtropicalDryForest,
    SubtropicalMoistForest,
    SubtropicalWetForest,
    SubtropicalRainForest,
    TropicalDesert,
    TropicalDesertScrub,
    TropicalThornWoodland,
    TropicalVeryDryForest,
    TropicalDryForest,
    TropicalMoistForest,
    TropicalWetForest,
    TropicalRainForest,
    BareRock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeGroup {
    BorealForest,
    CoolTemperateForest,
    WarmTemperateForest,
    TropicalDryForest,
    Tundra,
    Iceland,
    Jungle,
    Savanna,
    HotDesert,
    ColdParklands,
    Steppe,
    CoolDesert,
    Chaparral,
    None,
}

/// Maps a biome to its rendering group. Grounded in the source's
/// `biomeGroups_` table; every one of the 41 variants is listed here
/// explicitly rather than falling through a default arm, so a future new
/// biome variant fails to compile instead of silently landing in `None`.
pub fn biome_group(biome: Biome) -> BiomeGroup {
    use Biome::*;
    use BiomeGroup as G;
    match biome {
        Ocean | Sea | BareRock => G::None,
        PolarDesert | Ice => G::Iceland,
        SubpolarDryTundra | BorealDesert | BorealDryScrub => G::ColdParklands,
        SubpolarMoistTundra | SubpolarWetTundra | SubpolarRainTundra => G::Tundra,
        BorealMoistForest | BorealWetForest | BorealRainForest => G::BorealForest,
        CoolTemperateDesert | CoolTemperateDesertScrub => G::CoolDesert,
        CoolTemperateSteppe => G::Steppe,
        CoolTemperateMoistForest | CoolTemperateWetForest | CoolTemperateRainForest => {
            G::CoolTemperateForest
        }
        WarmTemperateDesert | WarmTemperateDesertScrub => G::HotDesert,
        WarmTemperateThornScrub | WarmTemperateDryForest => G::Chaparral,
        WarmTemperateMoistForest | WarmTemperateWetForest | WarmTemperateRainForest => {
            G::WarmTemperateForest
        }
        SubtropicalDesert | SubtropicalDesertScrub => G::HotDesert,
        SubtropicalThornWoodland => G::Savanna,
        SubtropicalDryForest => G::TropicalDryForest,
        SubtropicalMoistForest | SubtropicalWetForest | SubtropicalRainForest => G::Jungle,
        TropicalDesert | TropicalDesertScrub => G::HotDesert,
        TropicalThornWoodland | TropicalVeryDryForest => G::Savanna,
        TropicalDryForest => G::TropicalDryForest,
        TropicalMoistForest | TropicalWetForest | TropicalRainForest => G::Jungle,
    }
}

/// Root aggregate. Layers are populated monotonically by pipeline stages;
/// `None` means "not yet present", not "empty".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub seed: u32,
    pub params: GenerationParams,
    pub generation_level: GenerationLevel,

    pub elevation: Vec<f32>,
    pub plates: Vec<u16>,

    pub ocean: Option<Vec<bool>>,
    pub sea_depth: Option<Vec<f32>>,
    pub temperature: Option<Vec<f32>>,
    pub precipitation: Option<Vec<f32>>,
    pub permeability: Option<Vec<f32>>,
    pub irrigation: Option<Vec<f32>>,
    pub water_map: Option<Vec<f32>>,
    pub river_map: Option<Vec<f32>>,
    pub lake_map: Option<Vec<f32>>,
    pub humidity: Option<Vec<f32>>,
    pub icecap: Option<Vec<f32>>,
    pub biome: Option<Vec<Biome>>,

    pub hill_threshold: f32,
    pub mountain_threshold: f32,
    pub temperature_thresholds: [f32; 7],
    pub humidity_thresholds: [f32; 8],
    pub precipitation_thresholds: [f32; 3],
    pub permeability_thresholds: [f32; 3],
    pub water_thresholds: [f32; 3],
}

impl World {
    /// A freshly created world holding only the tectonic-driver output.
    pub fn new(name: String, params: GenerationParams, elevation: Vec<f32>, plates: Vec<u16>) -> Self {
        let width = params.width;
        let height = params.height;
        assert_eq!(elevation.len(), width * height);
        assert_eq!(plates.len(), width * height);

        Self {
            name,
            width,
            height,
            seed: params.seed,
            temperature_thresholds: [f32::INFINITY; 7],
            humidity_thresholds: [f32::INFINITY; 8],
            precipitation_thresholds: [0.0; 3],
            permeability_thresholds: [f32::INFINITY; 3],
            water_thresholds: [0.0; 3],
            hill_threshold: f32::INFINITY,
            mountain_threshold: f32::INFINITY,
            generation_level: GenerationLevel::PlatesOnly,
            params,
            elevation,
            plates,
            ocean: None,
            sea_depth: None,
            temperature: None,
            precipitation: None,
            permeability: None,
            irrigation: None,
            water_map: None,
            river_map: None,
            lake_map: None,
            humidity: None,
            icecap: None,
            biome: None,
        }
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn elevation_at(&self, x: usize, y: usize) -> f32 {
        self.elevation[self.index(x, y)]
    }

    pub fn get_threshold(&self, band: ElevationThreshold) -> f32 {
        match band {
            ElevationThreshold::Sea => self.params.ocean_level,
            ElevationThreshold::Hill => self.hill_threshold,
            ElevationThreshold::Mountain => self.mountain_threshold,
        }
    }

    pub fn set_threshold(&mut self, band: ElevationThreshold, value: f32) {
        match band {
            ElevationThreshold::Sea => self.params.ocean_level = value,
            ElevationThreshold::Hill => self.hill_threshold = value,
            ElevationThreshold::Mountain => self.mountain_threshold = value,
        }
    }

    pub fn get_temperature_threshold(&self, band: TemperatureBand) -> f32 {
        self.temperature_thresholds[band as usize]
    }

    pub fn set_temperature_threshold(&mut self, band: TemperatureBand, value: f32) {
        self.temperature_thresholds[band as usize] = value;
    }

    pub fn get_humidity_threshold(&self, band: HumidityBand) -> f32 {
        self.humidity_thresholds[band as usize]
    }

    pub fn set_humidity_threshold(&mut self, band: HumidityBand, value: f32) {
        self.humidity_thresholds[band as usize] = value;
    }

    pub fn get_precipitation_threshold(&self, band: PrecipitationBand) -> f32 {
        self.precipitation_thresholds[band as usize]
    }

    pub fn set_precipitation_threshold(&mut self, band: PrecipitationBand, value: f32) {
        self.precipitation_thresholds[band as usize] = value;
    }

    pub fn get_permeability_threshold(&self, band: PermeabilityBand) -> f32 {
        self.permeability_thresholds[band as usize]
    }

    pub fn set_permeability_threshold(&mut self, band: PermeabilityBand, value: f32) {
        self.permeability_thresholds[band as usize] = value;
    }

    pub fn get_water_threshold(&self, band: WaterThreshold) -> f32 {
        self.water_thresholds[band as usize]
    }

    pub fn set_water_threshold(&mut self, band: WaterThreshold, value: f32) {
        self.water_thresholds[band as usize] = value;
    }

    pub fn is_ocean(&self, x: usize, y: usize) -> bool {
        self.ocean
            .as_ref()
            .map(|o| o[self.index(x, y)])
            .unwrap_or(false)
    }

    pub fn is_mountain(&self, x: usize, y: usize) -> bool {
        !self.is_ocean(x, y) && self.elevation_at(x, y) > self.mountain_threshold
    }

    pub fn temperature_band(&self, x: usize, y: usize) -> TemperatureBand {
        let t = self.temperature.as_ref().expect("temperature not present")[self.index(x, y)];
        for band in TEMPERATURE_BANDS {
            if self.get_temperature_threshold(band) > t {
                return band;
            }
        }
        TemperatureBand::Tropical
    }

    pub fn humidity_band(&self, x: usize, y: usize) -> HumidityBand {
        let h = self.humidity.as_ref().expect("humidity not present")[self.index(x, y)];
        for band in HUMIDITY_BANDS {
            if self.get_humidity_threshold(band) > h {
                return band;
            }
        }
        HumidityBand::Superhumid
    }

    pub fn biome_group_at(&self, x: usize, y: usize) -> BiomeGroup {
        let b = self.biome.as_ref().expect("biome not present")[self.index(x, y)];
        biome_group(b)
    }

    /// Clipped 3x3 Chebyshev neighborhood, non-wrapping.
    pub fn tiles_around(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(8);
        let (x, y) = (x as i64, y as i64);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if self.contains(nx, ny) {
                    out.push((nx as usize, ny as usize));
                }
            }
        }
        out
    }

    /// 8-neighbor set with torus wrap semantics.
    pub fn around_toroidal(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(8);
        let (x, y) = (x as i64, y as i64);
        let (w, h) = (self.width as i64, self.height as i64);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x + dx).rem_euclid(w);
                let ny = (y + dy).rem_euclid(h);
                out.push((nx as usize, ny as usize));
            }
        }
        out
    }

    /// Enumerate land cells in row-major order, then draw `n` uniform
    /// indices with replacement. Empty if there is no land.
    pub fn random_land(&self, n: usize, seed: u32) -> Vec<(usize, usize)> {
        use rand::Rng;

        let land: Vec<(usize, usize)> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| !self.is_ocean(x, y))
            .collect();

        if land.is_empty() {
            return Vec::new();
        }

        let mut rng = crate::rng::rng_from_seed(seed);
        (0..n)
            .map(|_| land[rng.gen_range(0..land.len())])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_world(width: usize, height: usize) -> World {
        let params = GenerationParams {
            width,
            height,
            ..Default::default()
        };
        World::new(
            "test".into(),
            params,
            vec![0.0; width * height],
            vec![0; width * height],
        )
    }

    #[test]
    fn temperature_band_falls_through_to_tropical() {
        let mut w = flat_world(2, 2);
        w.temperature = Some(vec![100.0; 4]);
        assert_eq!(w.temperature_band(0, 0), TemperatureBand::Tropical);
    }

    #[test]
    fn random_land_excludes_ocean() {
        let mut w = flat_world(100, 90);
        let ocean: Vec<bool> = (0..90)
            .flat_map(|y| (0..100).map(move |x| y >= x))
            .collect();
        w.ocean = Some(ocean);

        let samples = w.random_land(1000, 0);
        assert_eq!(samples.len(), 1000);
        assert!(samples.iter().all(|&(x, y)| !w.is_ocean(x, y)));
    }

    #[test]
    fn random_land_empty_when_no_land() {
        let mut w = flat_world(4, 4);
        w.ocean = Some(vec![true; 16]);
        assert!(w.random_land(10, 0).is_empty());
    }

    #[test]
    fn biome_group_covers_every_variant() {
        // Exercise a representative sample; full coverage is enforced by the
        // compiler since `biome_group` has no default match arm.
        assert_eq!(biome_group(Biome::Ocean), BiomeGroup::None);
        assert_eq!(biome_group(Biome::BareRock), BiomeGroup::None);
        assert_eq!(biome_group(Biome::TropicalRainForest), BiomeGroup::Jungle);
    }
}
