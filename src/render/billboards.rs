//! Billboard-sprite layer rendering.
//!
//! Billboards are placed procedurally from the layer seed and splatted onto
//! each face with a gnomonic projection, so a sprite straddling a face edge
//! is drawn on both faces at matching positions.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{face_uv_unclamped, CubeFace};
use crate::layers::{BillboardFieldParams, Layer};

use super::buffer::FaceBuffer;
use super::RenderError;

/// Decoded sprite image in linear f32.
pub(crate) struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Sprite {
    /// Loads a sprite from disk, converting to RGBA f32.
    fn load(path: &std::path::Path) -> Result<Sprite, RenderError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                [
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0,
                ]
            })
            .collect();
        Ok(Sprite {
            width,
            height,
            pixels,
        })
    }

    /// Soft radial flare used when no sprite image is configured.
    fn procedural_flare(size: u32) -> Sprite {
        let mut pixels = Vec::with_capacity((size * size) as usize);
        let half = (size as f32 - 1.0) * 0.5;
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 - half) / half.max(1.0);
                let dy = (y as f32 - half) / half.max(1.0);
                let d = (dx * dx + dy * dy).sqrt().min(1.0);
                let intensity = (1.0 - d) * (1.0 - d);
                pixels.push([intensity, intensity, intensity, intensity]);
            }
        }
        Sprite {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Bilinear sample with UV in [0, 1], clamped at the border.
    fn sample(&self, u: f32, v: f32) -> [f32; 4] {
        let fx = (u.clamp(0.0, 1.0) * (self.width - 1) as f32).max(0.0);
        let fy = (v.clamp(0.0, 1.0) * (self.height - 1) as f32).max(0.0);
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let at = |x: u32, y: u32| self.pixels[(y * self.width + x) as usize];
        let lerp = |a: [f32; 4], b: [f32; 4], t: f32| {
            [
                a[0] + (b[0] - a[0]) * t,
                a[1] + (b[1] - a[1]) * t,
                a[2] + (b[2] - a[2]) * t,
                a[3] + (b[3] - a[3]) * t,
            ]
        };

        let top = lerp(at(x0, y0), at(x1, y0), tx);
        let bottom = lerp(at(x0, y1), at(x1, y1), tx);
        lerp(top, bottom, ty)
    }
}

/// One placed billboard.
struct Placement {
    direction: Vec3,
    /// Apparent size as a fraction of the face width.
    size: f32,
}

/// Places billboards from the layer seed. The placement sequence does not
/// depend on the face being rendered, so all six faces see the same field.
fn place(seed: u32, params: &BillboardFieldParams) -> Vec<Placement> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let min = params.min_size.max(0.0);
    let max = params.max_size.max(min);

    (0..params.num_billboards)
        .map(|_| {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
            let direction = Vec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );
            let distance = rng.random::<f32>();
            // Near billboards (low simulated distance) use the max size.
            let size = min + (max - min) * (1.0 - distance);
            Placement { direction, size }
        })
        .collect()
}

/// Splats one billboard onto the face if its quad overlaps it.
pub(crate) fn splat(
    buffer: &mut FaceBuffer,
    face: CubeFace,
    direction: Vec3,
    size_fraction: f32,
    sprite: &Sprite,
    layer: &Layer,
) {
    let res = buffer.resolution();
    let Some((u, v)) = face_uv_unclamped(face, direction) else {
        return;
    };

    let size_px = (size_fraction * res as f32).max(1.0);
    let half = size_px * 0.5;
    let cx = u * res as f32;
    let cy = v * res as f32;

    let x0 = (cx - half).floor();
    let y0 = (cy - half).floor();
    if x0 >= res as f32 || y0 >= res as f32 || x0 + size_px < 0.0 || y0 + size_px < 0.0 {
        return;
    }

    let xs = x0.max(0.0) as u32;
    let ys = y0.max(0.0) as u32;
    let xe = ((cx + half).ceil() as i64).clamp(0, res as i64) as u32;
    let ye = ((cy + half).ceil() as i64).clamp(0, res as i64) as u32;

    for y in ys..ye {
        for x in xs..xe {
            let su = (x as f32 + 0.5 - (cx - half)) / size_px;
            let sv = (y as f32 + 0.5 - (cy - half)) / size_px;
            if !(0.0..=1.0).contains(&su) || !(0.0..=1.0).contains(&sv) {
                continue;
            }
            let src = sprite.sample(su, sv);
            buffer.blend(x, y, src, layer.blend);
        }
    }
}

/// Renders a billboard-field layer into the face buffer.
pub fn render(
    layer: &Layer,
    params: &BillboardFieldParams,
    face: CubeFace,
    buffer: &mut FaceBuffer,
    mut progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), RenderError> {
    let sprite = match &params.texture {
        Some(path) => Sprite::load(path)?,
        None => Sprite::procedural_flare(64),
    };

    let placements = place(layer.seed, params);
    let total = placements.len();
    let report_every = (total / 100).max(1);

    for (i, placement) in placements.iter().enumerate() {
        splat(
            buffer,
            face,
            placement.direction,
            placement.size,
            &sprite,
            layer,
        );
        if let Some(cb) = progress.as_mut() {
            if (i + 1) % report_every == 0 || i + 1 == total {
                cb((i + 1) as f32 / total as f32 * 100.0);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{LayerKind, LayerParams, LayerStack};

    fn billboard_layer() -> LayerStack {
        let mut stack = LayerStack::new();
        let id = stack.add(LayerKind::Billboards);
        stack.layer_mut(id).unwrap().seed = 42;
        stack
    }

    fn lit_pixels(buffer: &FaceBuffer) -> usize {
        buffer.pixels().iter().filter(|p| p[0] > 0.0).count()
    }

    #[test]
    fn test_render_is_deterministic() {
        let stack = billboard_layer();
        let layer = stack.iter().next().unwrap();
        let LayerParams::Billboards(params) = &layer.params else {
            panic!("wrong kind")
        };

        let mut a = FaceBuffer::new(64);
        render(layer, params, CubeFace::PosX, &mut a, None).unwrap();
        let mut b = FaceBuffer::new(64);
        render(layer, params, CubeFace::PosX, &mut b, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_procedural_flare_lights_pixels() {
        let stack = billboard_layer();
        let layer = stack.iter().next().unwrap();
        let LayerParams::Billboards(params) = &layer.params else {
            panic!("wrong kind")
        };
        let mut buffer = FaceBuffer::new(64);
        render(layer, params, CubeFace::PosZ, &mut buffer, None).unwrap();
        assert!(lit_pixels(&buffer) > 0);
    }

    #[test]
    fn test_edge_billboard_lands_on_both_faces() {
        let stack = billboard_layer();
        let layer = stack.iter().next().unwrap();
        let sprite = Sprite::procedural_flare(16);

        // A direction on the shared edge between the top and front faces.
        let edge = Vec3::new(0.0, 1.0, 1.0).normalize();

        let mut top = FaceBuffer::new(32);
        splat(&mut top, CubeFace::PosY, edge, 0.25, &sprite, layer);
        let mut front = FaceBuffer::new(32);
        splat(&mut front, CubeFace::PosZ, edge, 0.25, &sprite, layer);

        assert!(lit_pixels(&top) > 0, "edge sprite missing from top face");
        assert!(lit_pixels(&front) > 0, "edge sprite missing from front face");
    }

    #[test]
    fn test_back_hemisphere_billboard_is_skipped() {
        let stack = billboard_layer();
        let layer = stack.iter().next().unwrap();
        let sprite = Sprite::procedural_flare(16);

        let mut buffer = FaceBuffer::new(32);
        splat(
            &mut buffer,
            CubeFace::PosZ,
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            &sprite,
            layer,
        );
        assert_eq!(lit_pixels(&buffer), 0);
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let mut stack = billboard_layer();
        {
            let id = stack.iter().next().unwrap().id();
            let layer = stack.layer_mut(id).unwrap();
            let LayerParams::Billboards(p) = &mut layer.params else {
                panic!("wrong kind")
            };
            p.texture = Some("/nonexistent/sprite.png".into());
        }
        let layer = stack.iter().next().unwrap();
        let LayerParams::Billboards(params) = &layer.params else {
            panic!("wrong kind")
        };
        let mut buffer = FaceBuffer::new(16);
        assert!(render(layer, params, CubeFace::PosZ, &mut buffer, None).is_err());
    }

    #[test]
    fn test_sprite_bilinear_sampling_interpolates() {
        let sprite = Sprite {
            width: 2,
            height: 1,
            pixels: vec![[0.0, 0.0, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0]],
        };
        let mid = sprite.sample(0.5, 0.0);
        assert!((mid[0] - 0.5).abs() < 1e-6);
    }
}
