//! Layer configuration: typed parameters, the ordered stack, star catalogs.

mod catalog;
mod params;
mod stack;

pub use catalog::{bv_to_rgb, CatalogError, StarCatalog, StarRecord};
pub use params::{
    BillboardFieldParams, BlendFactor, BlendPair, LayerKind, LayerParams, NoiseMode, NoiseParams,
    NoiseSheetParams, ParamMap, PointFieldParams, Rgba,
};
pub use stack::{Layer, LayerStack};
