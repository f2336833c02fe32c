//! Layered noise and piecewise-linear interpolation shared by several stages.
//!
//! Temperature and precipitation both sample octave-summed simplex noise and
//! blend it across the left border to hide the seam where x wraps back to
//! 0; both call through `layered_with_wrap_blend` so the "keep them
//! identical" requirement is structural, not a convention to remember.

use noise::NoiseFn;

/// Sum `octaves` octaves of noise at `base_freq * octave`, each weighted by
/// `1 / octave`. Unnormalized: the harmonic falloff keeps the sum bounded,
/// but amplitude is not rescaled back to `[-1, 1]`.
pub fn layered_noise<N: NoiseFn<f64, 2>>(noise_fn: &N, x: f64, y: f64, octaves: u32, base_freq: f64) -> f32 {
    let mut total = 0.0_f64;
    for o in 1..=octaves {
        let o = o as f64;
        let freq = base_freq * o;
        total += noise_fn.get([x * freq, y * freq]) / o;
    }
    total as f32
}

/// `layered_noise` sampled at grid coordinate `(x, y)`, blended against a
/// wrapped sample within the leftmost `width / 4` columns so the noise field
/// tiles seamlessly at the torus seam.
pub fn layered_with_wrap_blend<N: NoiseFn<f64, 2>>(
    noise_fn: &N,
    x: usize,
    y: usize,
    width: usize,
    octaves: u32,
    base_freq: f64,
    n_scale: f64,
) -> f32 {
    let border = width / 4;
    let fy = y as f64 * n_scale;
    let primary = layered_noise(noise_fn, x as f64 * n_scale, fy, octaves, base_freq);

    if border > 0 && x < border {
        let wrapped = layered_noise(noise_fn, (x + width) as f64 * n_scale, fy, octaves, base_freq);
        let blend = x as f64 / border as f64;
        (primary as f64 * blend + wrapped as f64 * (1.0 - blend)) as f32
    } else {
        primary
    }
}

/// Piecewise-linear interpolation over a sorted set of `(x, y)` points.
/// Clamps to the first/last point's y outside the covered range.
pub fn interpolate(x: f32, points: &[(f32, f32)]) -> f32 {
    debug_assert!(!points.is_empty());

    if x <= points[0].0 {
        return points[0].1;
    }
    if let Some(last) = points.last() {
        if x >= last.0 {
            return last.1;
        }
    }

    for w in points.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if x >= x0 && x <= x1 {
            if (x1 - x0).abs() < f32::EPSILON {
                return y0;
            }
            let t = (x - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }

    points.last().unwrap().1
}
