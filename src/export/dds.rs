//! Packed cube-map container export (DDS).
//!
//! Writes one `.dds` file holding all six faces, uncompressed, in the
//! container's +X, −X, +Y, −Y, +Z, −Z order. LDR output uses 32-bit RGBA;
//! HDR output uses float RGBA with a DX10 extension header.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::render::{FaceBuffer, PixelFormat};

use super::ExportError;

const DDS_MAGIC: &[u8; 4] = b"DDS ";

// Header flags: caps | height | width | pitch | pixelformat.
const DDSD_FLAGS: u32 = 0x1 | 0x2 | 0x4 | 0x8 | 0x1000;
// Caps: complex | texture.
const DDSCAPS: u32 = 0x8 | 0x1000;
// Caps2: cubemap with all six faces present.
const DDSCAPS2_CUBEMAP_ALL: u32 = 0x200 | 0x400 | 0x800 | 0x1000 | 0x2000 | 0x4000 | 0x8000;

// DX10 extension values for float RGBA.
const DXGI_FORMAT_R32G32B32A32_FLOAT: u32 = 2;
const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;
const D3D10_RESOURCE_MISC_TEXTURECUBE: u32 = 0x4;

fn bytes_per_pixel(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Rgba8 => 4,
        PixelFormat::RgbaF32 => 16,
    }
}

/// Returns the expected size in bytes of a packed cube-map file.
pub fn expected_file_size(resolution: u32, format: PixelFormat) -> u64 {
    let header = match format {
        PixelFormat::Rgba8 => 128u64,
        PixelFormat::RgbaF32 => 128 + 20,
    };
    header + 6 * (resolution as u64) * (resolution as u64) * bytes_per_pixel(format) as u64
}

fn put<W: Write>(writer: &mut W, value: u32) -> std::io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_header<W: Write>(
    writer: &mut W,
    resolution: u32,
    format: PixelFormat,
) -> std::io::Result<()> {
    writer.write_all(DDS_MAGIC)?;

    let pitch = resolution * bytes_per_pixel(format);

    put(writer, 124)?; // header size
    put(writer, DDSD_FLAGS)?;
    put(writer, resolution)?; // height
    put(writer, resolution)?; // width
    put(writer, pitch)?;
    put(writer, 0)?; // depth
    put(writer, 0)?; // mipmap count
    for _ in 0..11 {
        put(writer, 0)?; // reserved
    }

    // DDS_PIXELFORMAT.
    put(writer, 32)?; // struct size
    match format {
        PixelFormat::Rgba8 => {
            put(writer, 0x40 | 0x1)?; // RGB | alpha pixels
            put(writer, 0)?; // no fourCC
            put(writer, 32)?; // bits per pixel
            put(writer, 0x0000_00FF)?; // R mask
            put(writer, 0x0000_FF00)?; // G mask
            put(writer, 0x00FF_0000)?; // B mask
            put(writer, 0xFF00_0000)?; // A mask
        }
        PixelFormat::RgbaF32 => {
            put(writer, 0x4)?; // fourCC present
            writer.write_all(b"DX10")?;
            for _ in 0..5 {
                put(writer, 0)?;
            }
        }
    }

    put(writer, DDSCAPS)?;
    put(writer, DDSCAPS2_CUBEMAP_ALL)?;
    put(writer, 0)?; // caps3
    put(writer, 0)?; // caps4
    put(writer, 0)?; // reserved2

    if format == PixelFormat::RgbaF32 {
        put(writer, DXGI_FORMAT_R32G32B32A32_FLOAT)?;
        put(writer, D3D10_RESOURCE_DIMENSION_TEXTURE2D)?;
        put(writer, D3D10_RESOURCE_MISC_TEXTURECUBE)?;
        put(writer, 1)?; // array size
        put(writer, 0)?; // misc flags 2
    }

    Ok(())
}

/// Writes six finished faces (already remapped into container order) into
/// one packed DDS cube map.
pub fn write_cubemap_dds(
    faces: &[FaceBuffer],
    path: &Path,
    format: PixelFormat,
) -> Result<(), ExportError> {
    if faces.len() != 6 {
        return Err(ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cube map needs 6 faces, got {}", faces.len()),
        )));
    }
    let resolution = faces[0].resolution();
    if faces.iter().any(|f| f.resolution() != resolution) {
        return Err(ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "cube map faces must share one resolution",
        )));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_header(&mut writer, resolution, format)?;

    for face in faces {
        match format {
            PixelFormat::Rgba8 => {
                writer.write_all(&face.to_rgba8())?;
            }
            PixelFormat::RgbaF32 => {
                let floats: &[f32] = bytemuck::cast_slice(face.pixels());
                writer.write_all(bytemuck::cast_slice(floats))?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
