//! Layer rendering.
//!
//! A [`RenderContext`] carries the permutation-table cache through a render
//! pass; [`render_layer`] dispatches on the layer kind and writes into the
//! caller's [`FaceBuffer`]. Rendering is synchronous and single-threaded:
//! the progress callback is cooperative yielding, not concurrency.

mod billboards;
mod buffer;
mod noise_sheet;
mod points;

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::geometry::CubeFace;
use crate::layers::{CatalogError, Layer, LayerParams};
use crate::noise::PermutationTable;

pub use buffer::{FaceBuffer, PixelFormat, Quarter};

/// Errors that can occur while rendering a layer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("star catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("sprite image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Explicit per-pass state: a cache of permutation tables keyed by seed.
///
/// Passing the context as a value (rather than keeping a shared instance)
/// lets independent skyboxes render without touching each other, even
/// though any single render pass stays single-threaded.
#[derive(Debug, Default)]
pub struct RenderContext {
    tables: HashMap<u32, PermutationTable>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for a seed, building it on first use. A layer
    /// whose seed changes simply misses the cache and gets a fresh table.
    pub fn table(&mut self, seed: u32) -> &PermutationTable {
        self.tables
            .entry(seed)
            .or_insert_with(|| PermutationTable::build(seed))
    }
}

/// Renders one layer into the face buffer.
///
/// Writes only into `buffer`; the layer configuration is never mutated. The
/// optional callback receives percent-complete values in [0, 100].
pub fn render_layer(
    ctx: &mut RenderContext,
    layer: &Layer,
    face: CubeFace,
    buffer: &mut FaceBuffer,
    hdr: bool,
    progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), RenderError> {
    debug!(
        layer = layer.name.as_str(),
        kind = layer.kind().name(),
        face = face.short_name(),
        resolution = buffer.resolution(),
        "rendering layer"
    );

    match &layer.params {
        LayerParams::Noise(params) => {
            noise_sheet::render(ctx, layer, params, face, buffer, hdr, progress)
        }
        LayerParams::Points(params) => {
            points::render(layer, params, face, buffer, hdr, progress)
        }
        LayerParams::Billboards(params) => {
            billboards::render(layer, params, face, buffer, progress)
        }
    }
}
