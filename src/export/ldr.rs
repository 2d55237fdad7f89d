//! LDR face encoding (PNG, JPG, TGA) via the `image` crate.

use std::path::Path;

use image::{ExtendedColorType, ImageFormat};

use crate::render::FaceBuffer;

use super::ExportError;

/// Low-dynamic-range file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LdrFormat {
    Png,
    Jpg,
    Tga,
}

impl LdrFormat {
    pub fn extension(self) -> &'static str {
        match self {
            LdrFormat::Png => "png",
            LdrFormat::Jpg => "jpg",
            LdrFormat::Tga => "tga",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            LdrFormat::Png => ImageFormat::Png,
            LdrFormat::Jpg => ImageFormat::Jpeg,
            LdrFormat::Tga => ImageFormat::Tga,
        }
    }
}

/// Writes one face as an 8-bit image file, clamping HDR values.
///
/// JPEG has no alpha channel, so that format drops to RGB.
pub fn write_face_ldr(
    buffer: &FaceBuffer,
    path: &Path,
    format: LdrFormat,
) -> Result<(), ExportError> {
    let res = buffer.resolution();
    let rgba = buffer.to_rgba8();

    match format {
        LdrFormat::Jpg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::save_buffer_with_format(
                path,
                &rgb,
                res,
                res,
                ExtendedColorType::Rgb8,
                format.image_format(),
            )?;
        }
        _ => {
            image::save_buffer_with_format(
                path,
                &rgba,
                res,
                res,
                ExtendedColorType::Rgba8,
                format.image_format(),
            )?;
        }
    }

    Ok(())
}
