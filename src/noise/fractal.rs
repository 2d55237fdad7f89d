//! Fractal composition: fbm and ridged multifractal over a base evaluator.

use glam::DVec3;

use super::permutation::PermutationTable;

/// A base noise evaluator usable by the fractal combinators.
pub type NoiseFn = fn(&PermutationTable, f64, f64, f64) -> f64;

/// Clamps fractal parameters that would otherwise degenerate.
///
/// Zero octaves would produce silence and a non-positive lacunarity would
/// collapse every octave onto the same frequency; both are treated as
/// configuration mistakes and snapped to safe values.
#[inline]
pub(crate) fn sanitize(octaves: u32, lacunarity: f64) -> (u32, f64) {
    let octaves = octaves.max(1);
    let lacunarity = if lacunarity > 0.0 { lacunarity } else { 2.0 };
    (octaves, lacunarity)
}

/// Fractal Brownian motion: octave sum of the base noise.
///
/// Octave `i` samples `point * lacunarity^i` with amplitude `gain^i`. The
/// raw sum is returned; use [`fbm_normalized`] to rescale by the accumulated
/// amplitude so the theoretical bound matches the base function's.
pub fn fbm(
    noise: NoiseFn,
    table: &PermutationTable,
    point: DVec3,
    octaves: u32,
    gain: f64,
    lacunarity: f64,
) -> f64 {
    let (octaves, lacunarity) = sanitize(octaves, lacunarity);
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut p = point;

    for _ in 0..octaves {
        sum += noise(table, p.x, p.y, p.z) * amplitude;
        amplitude *= gain;
        p *= lacunarity;
    }

    sum
}

/// fbm rescaled by the total amplitude `sum(gain^i)`.
pub fn fbm_normalized(
    noise: NoiseFn,
    table: &PermutationTable,
    point: DVec3,
    octaves: u32,
    gain: f64,
    lacunarity: f64,
) -> f64 {
    let (octaves, lacunarity) = sanitize(octaves, lacunarity);
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut total = 0.0;
    let mut p = point;

    for _ in 0..octaves {
        sum += noise(table, p.x, p.y, p.z) * amplitude;
        total += amplitude;
        amplitude *= gain;
        p *= lacunarity;
    }

    if total > 0.0 {
        sum / total
    } else {
        sum
    }
}

/// Ridge shaping: `(offset - |value|)^2`.
///
/// Maximized where the input noise crosses zero, which is what turns smooth
/// noise into crease patterns.
#[inline]
pub fn ridge(value: f64, offset: f64) -> f64 {
    let r = offset - value.abs();
    r * r
}

/// Ridged multifractal: per-octave ridge shaping where each successive
/// octave is additionally weighted by the previous octave's ridged value.
///
/// This is a distinct evaluation path rather than a post-filter because the
/// recursive weighting depends on prior-octave output.
pub fn ridged_fbm(
    noise: NoiseFn,
    table: &PermutationTable,
    point: DVec3,
    octaves: u32,
    gain: f64,
    lacunarity: f64,
    offset: f64,
) -> f64 {
    let (octaves, lacunarity) = sanitize(octaves, lacunarity);
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut prev = 1.0;
    let mut p = point;

    for _ in 0..octaves {
        let signal = ridge(noise(table, p.x, p.y, p.z), offset);
        sum += signal * amplitude * prev;
        prev = signal;
        amplitude *= gain;
        p *= lacunarity;
    }

    sum
}
