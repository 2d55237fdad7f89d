//! HDR face encoding as OpenEXR (RGBA float).

use std::path::Path;

use crate::render::FaceBuffer;

use super::ExportError;

/// Writes one face as a float RGBA `.exr` file.
///
/// Values are written unclamped so HDR highlights survive the round trip.
pub fn write_face_exr(buffer: &FaceBuffer, path: &Path) -> Result<(), ExportError> {
    let res = buffer.resolution() as usize;

    exr::prelude::write_rgba_file(path, res, res, |x, y| {
        let px = buffer.get(x as u32, y as u32);
        (px[0], px[1], px[2], px[3])
    })?;

    Ok(())
}
