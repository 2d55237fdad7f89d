//! Procedural space skybox generator.
//!
//! This crate renders layered space backgrounds (star fields, nebula
//! clouds, billboard flares) into the six faces of a seamless cube map and
//! exports them as discrete image files or one packed cube-map container.
//! Generation is deterministic: the same configuration and seeds always
//! produce the same pixels.

pub mod config;
pub mod export;
pub mod geometry;
pub mod layers;
pub mod noise;
pub mod render;
pub mod skybox;

pub use export::{export_skybox, ExportConvention, ExportFormat, ExportOptions};
pub use geometry::CubeFace;
pub use layers::{LayerKind, LayerParams, LayerStack};
pub use render::{FaceBuffer, PixelFormat, RenderContext};
pub use skybox::Skybox;
