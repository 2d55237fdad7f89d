//! Skybox export: composite, orientation remap, encode.
//!
//! Supports six discrete image files (PNG/JPG/TGA for LDR, EXR for HDR) or
//! one packed DDS cube-map container. A face write failure aborts the
//! remaining faces and reports the error; prior state is untouched.

mod dds;
mod exr;
mod ldr;
mod orientation;

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::render::{FaceBuffer, RenderContext, RenderError};
use crate::skybox::Skybox;

pub use self::dds::{expected_file_size, write_cubemap_dds};
pub use self::exr::write_face_exr;
pub use self::ldr::{write_face_ldr, LdrFormat};
pub use self::orientation::{slots, ExportConvention, FaceSlot};

/// Errors that can occur during skybox export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Image(#[from] ::image::ImageError),
    #[error("EXR encoding error: {0}")]
    Exr(#[from] ::exr::error::Error),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("resolution {0} is not a power of two")]
    InvalidResolution(u32),
}

/// Output file format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Six 8-bit PNG files.
    Png,
    /// Six 8-bit JPG files (no alpha).
    Jpg,
    /// Six 8-bit TGA files.
    Tga,
    /// Six float EXR files (HDR).
    Exr,
    /// One packed DDS cube map.
    Dds,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Tga => "tga",
            ExportFormat::Exr => "exr",
            ExportFormat::Dds => "dds",
        }
    }
}

/// Export parameters.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Face edge size in texels; must be a power of two.
    pub resolution: u32,
    pub format: ExportFormat,
    pub convention: ExportConvention,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            resolution: 512,
            format: ExportFormat::Png,
            convention: ExportConvention::Default,
        }
    }
}

/// Renders and exports a skybox.
///
/// Six-file formats write `{base_name}_{suffix}.{ext}` into `output_dir`
/// with the suffixes of the chosen convention; the DDS format writes one
/// `{base_name}.dds`. The optional callback receives percent-complete
/// values in [0, 100] for the render phase.
pub fn export_skybox(
    skybox: &Skybox,
    ctx: &mut RenderContext,
    output_dir: &Path,
    base_name: &str,
    options: &ExportOptions,
    progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), ExportError> {
    if options.resolution == 0 || !options.resolution.is_power_of_two() {
        return Err(ExportError::InvalidResolution(options.resolution));
    }

    std::fs::create_dir_all(output_dir)?;

    let canonical = skybox.render_all(ctx, options.resolution, progress)?;

    // Remap canonical faces into the convention's slot order.
    let remapped: Vec<(FaceBuffer, &'static str)> = slots(options.convention)
        .into_iter()
        .map(|slot| {
            (
                canonical[slot.face.index()].rotated(slot.rotation),
                slot.suffix,
            )
        })
        .collect();

    match options.format {
        ExportFormat::Dds => {
            let faces: Vec<FaceBuffer> = remapped.into_iter().map(|(face, _)| face).collect();
            let path = output_dir.join(format!("{}.dds", base_name));
            write_cubemap_dds(&faces, &path, skybox.pixel_format())?;
            info!(path = %path.display(), "wrote packed cube map");
        }
        ExportFormat::Exr => {
            for (face, suffix) in &remapped {
                let path = output_dir.join(format!("{}_{}.exr", base_name, suffix));
                write_face_exr(face, &path)?;
            }
            info!(dir = %output_dir.display(), "wrote 6 EXR faces");
        }
        ExportFormat::Png | ExportFormat::Jpg | ExportFormat::Tga => {
            let ldr = match options.format {
                ExportFormat::Png => LdrFormat::Png,
                ExportFormat::Jpg => LdrFormat::Jpg,
                _ => LdrFormat::Tga,
            };
            for (face, suffix) in &remapped {
                let path =
                    output_dir.join(format!("{}_{}.{}", base_name, suffix, ldr.extension()));
                write_face_ldr(face, &path, ldr)?;
            }
            info!(dir = %output_dir.display(), "wrote 6 LDR faces");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKind;
    use crate::render::PixelFormat;
    use tempfile::tempdir;

    fn test_skybox() -> Skybox {
        let mut skybox = Skybox::new();
        let id = skybox.add_layer(LayerKind::Noise);
        skybox.layer_mut(id).unwrap().seed = 42;
        skybox
    }

    #[test]
    fn test_export_six_png_files() {
        let dir = tempdir().unwrap();
        let skybox = test_skybox();
        let options = ExportOptions {
            resolution: 16,
            format: ExportFormat::Png,
            convention: ExportConvention::Default,
        };

        export_skybox(
            &skybox,
            &mut RenderContext::new(),
            dir.path(),
            "sky",
            &options,
            None,
        )
        .unwrap();

        for suffix in ["posx", "negx", "posy", "negy", "posz", "negz"] {
            assert!(
                dir.path().join(format!("sky_{}.png", suffix)).exists(),
                "missing face {}",
                suffix
            );
        }
    }

    #[test]
    fn test_export_convention_changes_suffixes() {
        let dir = tempdir().unwrap();
        let skybox = test_skybox();
        let options = ExportOptions {
            resolution: 16,
            format: ExportFormat::Png,
            convention: ExportConvention::Source,
        };

        export_skybox(
            &skybox,
            &mut RenderContext::new(),
            dir.path(),
            "sky",
            &options,
            None,
        )
        .unwrap();

        for suffix in ["rt", "lf", "up", "dn", "ft", "bk"] {
            assert!(dir.path().join(format!("sky_{}.png", suffix)).exists());
        }
    }

    #[test]
    fn test_export_packed_dds() {
        let dir = tempdir().unwrap();
        let skybox = test_skybox();
        let options = ExportOptions {
            resolution: 16,
            format: ExportFormat::Dds,
            convention: ExportConvention::Default,
        };

        export_skybox(
            &skybox,
            &mut RenderContext::new(),
            dir.path(),
            "sky",
            &options,
            None,
        )
        .unwrap();

        let path = dir.path().join("sky.dds");
        assert!(path.exists());
        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            expected_file_size(16, PixelFormat::Rgba8)
        );
    }

    #[test]
    fn test_export_hdr_exr() {
        let dir = tempdir().unwrap();
        let mut skybox = test_skybox();
        skybox.hdr = true;
        let options = ExportOptions {
            resolution: 16,
            format: ExportFormat::Exr,
            convention: ExportConvention::Default,
        };

        export_skybox(
            &skybox,
            &mut RenderContext::new(),
            dir.path(),
            "sky",
            &options,
            None,
        )
        .unwrap();

        assert!(dir.path().join("sky_posx.exr").exists());
    }

    #[test]
    fn test_non_power_of_two_resolution_is_rejected() {
        let dir = tempdir().unwrap();
        let skybox = test_skybox();
        let options = ExportOptions {
            resolution: 17,
            format: ExportFormat::Png,
            convention: ExportConvention::Default,
        };

        let result = export_skybox(
            &skybox,
            &mut RenderContext::new(),
            dir.path(),
            "sky",
            &options,
            None,
        );
        assert!(matches!(result, Err(ExportError::InvalidResolution(17))));
    }

    #[test]
    fn test_hidden_layer_export_matches_removed_layer_export() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();

        let mut with_hidden = test_skybox();
        let extra = with_hidden.add_layer(LayerKind::Points);
        with_hidden.set_layer_visible(extra, false);
        let without = test_skybox();

        let options = ExportOptions {
            resolution: 16,
            format: ExportFormat::Png,
            convention: ExportConvention::Default,
        };

        export_skybox(
            &with_hidden,
            &mut RenderContext::new(),
            dir_a.path(),
            "sky",
            &options,
            None,
        )
        .unwrap();
        export_skybox(
            &without,
            &mut RenderContext::new(),
            dir_b.path(),
            "sky",
            &options,
            None,
        )
        .unwrap();

        for suffix in ["posx", "negx", "posy", "negy", "posz", "negz"] {
            let a = std::fs::read(dir_a.path().join(format!("sky_{}.png", suffix))).unwrap();
            let b = std::fs::read(dir_b.path().join(format!("sky_{}.png", suffix))).unwrap();
            assert_eq!(a, b, "face {} differs", suffix);
        }
    }
}
