//! Noise-sheet layer rendering.
//!
//! Evaluates the layer's fractal noise for every texel of a face, shapes the
//! scalar (mask, power, threshold, dither) and blends the resulting color
//! into the accumulation buffer.

use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{project_to_direction, CubeFace};
use crate::layers::{Layer, NoiseMode, NoiseParams, NoiseSheetParams, Rgba};
use crate::noise::{fbm_normalized, perlin3, ridged_fbm, PermutationTable};

use super::buffer::FaceBuffer;
use super::{RenderContext, RenderError};

/// Evaluates one noise block at a direction, returning a shaped scalar in
/// [0, 1] (before dithering).
///
/// fbm output is remapped from [-1, 1]; ridged output is rescaled by the
/// octave amplitude sum. Both are clamped since neither base function is
/// tightly bounded.
fn shaped_value(table: &PermutationTable, params: &NoiseParams, dir: DVec3) -> f64 {
    let point = dir * params.scale.max(0.0) as f64;
    let octaves = params.octaves;
    let gain = params.gain as f64;
    let lacunarity = params.lacunarity as f64;

    let raw = match params.mode {
        NoiseMode::Fbm => {
            let v = fbm_normalized(perlin3, table, point, octaves, gain, lacunarity);
            (v + 1.0) * 0.5
        }
        NoiseMode::Ridged => {
            let v = ridged_fbm(
                perlin3,
                table,
                point,
                octaves,
                gain,
                lacunarity,
                params.offset as f64,
            );
            let total: f64 = (0..octaves.max(1)).map(|i| gain.powi(i as i32)).sum();
            if total > 0.0 {
                v / total
            } else {
                v
            }
        }
    };
    let raw = raw.clamp(0.0, 1.0);

    // Exponent shaping, then the lower shelf. A non-positive power is a
    // configuration mistake and falls back to 1.
    let power = if params.power > 0.0 {
        params.power as f64
    } else {
        1.0
    };
    let shaped = raw.powf(power);

    let threshold = (params.threshold as f64).clamp(0.0, 1.0);
    if threshold >= 1.0 {
        return 0.0;
    }
    if shaped < threshold {
        0.0
    } else {
        (shaped - threshold) / (1.0 - threshold)
    }
}

/// Renders a noise-sheet layer into the face buffer.
pub fn render(
    ctx: &mut RenderContext,
    layer: &Layer,
    sheet: &NoiseSheetParams,
    face: CubeFace,
    buffer: &mut FaceBuffer,
    hdr: bool,
    mut progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), RenderError> {
    let res = buffer.resolution();
    let table = ctx.table(layer.seed).clone();
    let mask_table = if sheet.mask_enabled {
        Some(ctx.table(sheet.mask_seed).clone())
    } else {
        None
    };

    // Dither is deterministic per (layer seed, face) so repeated renders of
    // the same configuration stay byte-identical.
    let dither = sheet.noise.dither.max(0.0) as f64;
    let mut dither_rng = if dither > 0.0 {
        Some(ChaCha8Rng::seed_from_u64(
            (layer.seed as u64) << 8 | face.index() as u64,
        ))
    } else {
        None
    };

    let params = &sheet.noise;
    for y in 0..res {
        for x in 0..res {
            let u = (x as f32 + 0.5) / res as f32;
            let v = (y as f32 + 0.5) / res as f32;
            let dir = project_to_direction(face, u, v).as_dvec3();

            let mut value = shaped_value(&table, params, dir);

            // The thresholded mask value scales density rather than color.
            if let Some(mask_table) = &mask_table {
                value *= shaped_value(mask_table, &sheet.mask, dir);
            }

            if let Some(rng) = &mut dither_rng {
                value += (rng.random::<f64>() - 0.5) * dither;
            }

            let src = noise_color(params, value, hdr);
            buffer.blend(x, y, src, layer.blend);
        }

        if let Some(cb) = progress.as_mut() {
            cb((y + 1) as f32 / res as f32 * 100.0);
        }
    }

    Ok(())
}

/// Maps a shaped scalar to the layer's color gradient.
///
/// Non-HDR output interpolates outer→inner linearly and clamps. HDR output
/// additionally shapes the scalar with `hdr_power` and scales the color by
/// `hdr_multiplier`, leaving values unclamped for float formats.
fn noise_color(params: &NoiseParams, value: f64, hdr: bool) -> [f32; 4] {
    if hdr {
        let hdr_power = if params.hdr_power > 0.0 {
            params.hdr_power as f64
        } else {
            1.0
        };
        let v = value.max(0.0).powf(hdr_power) as f32;
        let color = params
            .outer_color
            .lerp(params.inner_color, v)
            .scaled(params.hdr_multiplier.max(0.0));
        [color.r, color.g, color.b, color.a * v]
    } else {
        let v = value.clamp(0.0, 1.0) as f32;
        let color: Rgba = params.outer_color.lerp(params.inner_color, v);
        [color.r, color.g, color.b, color.a * v]
    }
}
