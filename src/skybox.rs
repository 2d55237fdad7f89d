//! The skybox aggregate: an ordered layer stack plus global render flags.
//!
//! A `Skybox` is the unit of load/save. Layers are created and destroyed
//! only through its operations, which keeps ids and z-order consistent. The
//! stack must not be mutated while a render pass is in flight; Rust's
//! borrow rules enforce that here, since rendering borrows the skybox
//! immutably for its whole duration.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geometry::CubeFace;
use crate::layers::{Layer, LayerKind, LayerStack, ParamMap};
use crate::render::{render_layer, FaceBuffer, PixelFormat, RenderContext, RenderError};

/// Default preview/export edge size in texels.
pub const DEFAULT_PREVIEW_SIZE: u32 = 512;

/// A configured skybox: ordered layers plus global flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skybox {
    layers: LayerStack,
    /// HDR output: float pixel format plus the HDR-only noise shaping.
    pub hdr: bool,
    /// Texture edge size used for previews.
    pub preview_size: u32,
}

impl Skybox {
    pub fn new() -> Self {
        Self {
            layers: LayerStack::new(),
            hdr: false,
            preview_size: DEFAULT_PREVIEW_SIZE,
        }
    }

    /// Read access to the layer stack.
    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Appends a new layer of the given kind; returns its id.
    pub fn add_layer(&mut self, kind: LayerKind) -> u32 {
        self.layers.add(kind)
    }

    /// Appends a layer with explicit parameters; returns its id.
    pub fn add_layer_with(&mut self, params: crate::layers::LayerParams) -> u32 {
        self.layers.add_with(params)
    }

    /// Deep-copies a layer next to the source; returns the new id.
    pub fn duplicate_layer(&mut self, id: u32) -> Option<u32> {
        self.layers.duplicate(id)
    }

    pub fn delete_layer(&mut self, id: u32) -> bool {
        self.layers.delete(id)
    }

    pub fn move_layer_up(&mut self, id: u32) -> bool {
        self.layers.move_up(id)
    }

    pub fn move_layer_down(&mut self, id: u32) -> bool {
        self.layers.move_down(id)
    }

    pub fn set_layer_visible(&mut self, id: u32, visible: bool) -> bool {
        self.layers.set_visible(id, visible)
    }

    /// Applies a partial key/value update to a layer.
    pub fn update_layer(&mut self, id: u32, map: &ParamMap) -> bool {
        self.layers.update_params(id, map)
    }

    /// Typed mutable access for in-place parameter edits.
    pub fn layer_mut(&mut self, id: u32) -> Option<&mut Layer> {
        self.layers.layer_mut(id)
    }

    /// Pixel format implied by the HDR flag.
    pub fn pixel_format(&self) -> PixelFormat {
        if self.hdr {
            PixelFormat::RgbaF32
        } else {
            PixelFormat::Rgba8
        }
    }

    /// Renders one face: paints every visible layer back-to-front into a
    /// fresh accumulation buffer with each layer's blend factors.
    ///
    /// The optional callback receives percent-complete values in [0, 100]
    /// across the whole face (all layers).
    pub fn render_face(
        &self,
        ctx: &mut RenderContext,
        face: CubeFace,
        resolution: u32,
        mut progress: Option<&mut dyn FnMut(f32)>,
    ) -> Result<FaceBuffer, RenderError> {
        let mut buffer = FaceBuffer::new(resolution);
        let visible: Vec<&Layer> = self.layers.iter().filter(|l| l.visible).collect();
        let count = visible.len();

        for (i, layer) in visible.into_iter().enumerate() {
            let mut scaled = progress.as_mut().map(|cb| {
                move |pct: f32| cb((i as f32 * 100.0 + pct) / count as f32)
            });
            let scaled_dyn: Option<&mut dyn FnMut(f32)> =
                scaled.as_mut().map(|f| f as &mut dyn FnMut(f32));
            render_layer(ctx, layer, face, &mut buffer, self.hdr, scaled_dyn)?;
        }

        if let Some(cb) = progress {
            cb(100.0);
        }
        Ok(buffer)
    }

    /// Renders all six faces at the configured preview size.
    pub fn render_preview(
        &self,
        ctx: &mut RenderContext,
        progress: Option<&mut dyn FnMut(f32)>,
    ) -> Result<Vec<FaceBuffer>, RenderError> {
        self.render_all(ctx, self.preview_size.max(1), progress)
    }

    /// Renders all six faces in canonical order.
    pub fn render_all(
        &self,
        ctx: &mut RenderContext,
        resolution: u32,
        mut progress: Option<&mut dyn FnMut(f32)>,
    ) -> Result<Vec<FaceBuffer>, RenderError> {
        info!(resolution, layers = self.layers.len(), hdr = self.hdr, "rendering skybox");

        let mut faces = Vec::with_capacity(6);
        for (i, face) in CubeFace::all().into_iter().enumerate() {
            let mut scaled = progress.as_mut().map(|cb| {
                move |pct: f32| cb((i as f32 * 100.0 + pct) / 6.0)
            });
            let scaled_dyn: Option<&mut dyn FnMut(f32)> =
                scaled.as_mut().map(|f| f as &mut dyn FnMut(f32));
            faces.push(self.render_face(ctx, face, resolution, scaled_dyn)?);
        }
        Ok(faces)
    }
}
