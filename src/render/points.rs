//! Point-star layer rendering.
//!
//! Stars come from a catalog data file or a procedural catalog generated
//! from the layer seed. Each star projects to one face; its color is the
//! B−V tint scaled by magnitude-derived luminance and modulated by the
//! near/far color ramp.

use crate::geometry::{direction_to_face_uv, CubeFace};
use crate::layers::{bv_to_rgb, Layer, PointFieldParams, StarCatalog};

use super::buffer::FaceBuffer;
use super::RenderError;

/// Renders a point-field layer into the face buffer.
pub fn render(
    layer: &Layer,
    params: &PointFieldParams,
    face: CubeFace,
    buffer: &mut FaceBuffer,
    hdr: bool,
    mut progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), RenderError> {
    let catalog = match &params.data_file {
        Some(path) => StarCatalog::load_csv(path)?,
        None => StarCatalog::procedural(layer.seed, params.num_points),
    };

    let res = buffer.resolution();
    let brightest = catalog.min_magnitude();
    let total = catalog.stars.len();
    let report_every = (total / 100).max(1);

    for (i, star) in catalog.stars.iter().enumerate() {
        let (star_face, u, v) = direction_to_face_uv(star.direction);
        if star_face != face {
            if let Some(cb) = progress.as_mut() {
                if (i + 1) % report_every == 0 || i + 1 == total {
                    cb((i + 1) as f32 / total as f32 * 100.0);
                }
            }
            continue;
        }

        // Luminance relative to the brightest star in the catalog; the
        // magnitude scale is logarithmic (5 magnitudes = factor 100).
        let luminance = 10f32.powf(-0.4 * (star.magnitude - brightest));
        let luminance = if hdr { luminance } else { luminance.min(1.0) };

        let proximity = 1.0 - star.distance;
        let modulate = params.far_color.lerp(params.near_color, proximity);
        let tint = bv_to_rgb(star.bv);

        let src = [
            tint.r * modulate.r * luminance,
            tint.g * modulate.g * luminance,
            tint.b * modulate.b * luminance,
            modulate.a * luminance.min(1.0),
        ];

        rasterize_point(buffer, res, u, v, params.point_size, src, layer);

        if let Some(cb) = progress.as_mut() {
            if (i + 1) % report_every == 0 || i + 1 == total {
                cb((i + 1) as f32 / total as f32 * 100.0);
            }
        }
    }

    Ok(())
}

/// Writes a filled disc of `size` texels diameter centered on (u, v).
fn rasterize_point(
    buffer: &mut FaceBuffer,
    res: u32,
    u: f32,
    v: f32,
    size: u32,
    src: [f32; 4],
    layer: &Layer,
) {
    let size = size.max(1);
    let cx = u * res as f32 - 0.5;
    let cy = v * res as f32 - 0.5;
    let radius = size as f32 * 0.5;

    if size == 1 {
        let x = (cx.round() as i64).clamp(0, res as i64 - 1) as u32;
        let y = (cy.round() as i64).clamp(0, res as i64 - 1) as u32;
        buffer.blend(x, y, src, layer.blend);
        return;
    }

    let x0 = (cx - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(res - 1);
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let y1 = ((cy + radius).ceil() as u32).min(res - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= radius * radius {
                buffer.blend(x, y, src, layer.blend);
            }
        }
    }
}
