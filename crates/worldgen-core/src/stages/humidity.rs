//! Stage 11: humidity, derived from precipitation and irrigation.

use log::debug;

use crate::quantile::quantile_threshold;
use crate::world::{HumidityBand, World};

pub fn run(world: &mut World) {
    let (width, height) = (world.width, world.height);
    debug!("humidity: {width}x{height}");

    let precipitation = world
        .precipitation
        .as_ref()
        .expect("precipitation must run before humidity");
    let irrigation = world
        .irrigation
        .as_ref()
        .expect("irrigation must run before humidity");

    let humidity: Vec<f32> = precipitation
        .iter()
        .zip(irrigation.iter())
        .map(|(&p, &irr)| (p - 3.0 * irr) / 4.0)
        .collect();

    let ocean_mask = world.ocean.clone();
    let breakpoints = world.params.humidity_breakpoints;
    let bands = [
        HumidityBand::Superarid,
        HumidityBand::Perarid,
        HumidityBand::Arid,
        HumidityBand::Semiarid,
        HumidityBand::Subhumid,
        HumidityBand::Humid,
        HumidityBand::Perhumid,
    ];
    for (band, fraction) in bands.into_iter().zip(breakpoints.into_iter()) {
        let threshold = quantile_threshold(&humidity, ocean_mask.as_deref(), fraction);
        world.set_humidity_threshold(band, threshold);
    }
    // Catch-all band: everything not claimed by a lower band falls here.
    world.set_humidity_threshold(HumidityBand::Superhumid, f32::INFINITY);

    world.humidity = Some(humidity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GenerationParams;

    #[test]
    fn humidity_combines_precipitation_and_irrigation() {
        let params = GenerationParams {
            width: 8,
            height: 8,
            ..Default::default()
        };
        let mut world = World::new("t".into(), params, vec![0.0; 64], vec![0; 64]);
        world.ocean = Some(vec![false; 64]);
        world.precipitation = Some(vec![1.0; 64]);
        world.irrigation = Some(vec![0.0; 64]);

        run(&mut world);

        let humidity = world.humidity.unwrap();
        assert!(humidity.iter().all(|&v| (v - 0.25).abs() < 1e-6));
        assert_eq!(
            world.get_humidity_threshold(HumidityBand::Superhumid),
            f32::INFINITY
        );
    }
}
