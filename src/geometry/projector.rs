//! Texel-to-direction projection for cube faces.
//!
//! All six faces derive from one canonical "top face" mapping followed by a
//! fixed axis permutation per face. The transforms agree exactly at shared
//! edges, so adjacent faces sample continuous noise and the assembled cube
//! map has no seams.

use glam::Vec3;

use super::face::CubeFace;

/// Places UV coordinates on the unit cube surface for a face.
///
/// UV is in [0, 1] and maps to [-1, 1] across the face. The canonical top
/// face maps `(u, v)` to `(s, 1, t)`; every other face is a fixed axis
/// permutation/sign-flip of that point.
pub fn face_uv_to_cube(face: CubeFace, u: f32, v: f32) -> Vec3 {
    let s = u * 2.0 - 1.0;
    let t = v * 2.0 - 1.0;

    match face {
        CubeFace::PosX => Vec3::new(1.0, -t, -s),
        CubeFace::NegX => Vec3::new(-1.0, -t, s),
        CubeFace::PosY => Vec3::new(s, 1.0, t),
        CubeFace::NegY => Vec3::new(s, -1.0, -t),
        CubeFace::PosZ => Vec3::new(s, -t, 1.0),
        CubeFace::NegZ => Vec3::new(-s, -t, -1.0),
    }
}

/// Projects a face texel coordinate to a unit direction vector.
///
/// Pure and stateless; the noise renderers scale the result by the layer's
/// noise scale before sampling.
pub fn project_to_direction(face: CubeFace, u: f32, v: f32) -> Vec3 {
    face_uv_to_cube(face, u, v).normalize()
}

/// Maps a direction to the face it points through plus UV on that face.
///
/// The face is chosen by dominant axis; UV is clamped to [0, 1]. Inverse of
/// [`project_to_direction`] away from cube edges.
pub fn direction_to_face_uv(dir: Vec3) -> (CubeFace, f32, f32) {
    let a = dir.abs();

    let (face, s, t) = if a.x >= a.y && a.x >= a.z {
        if dir.x > 0.0 {
            (CubeFace::PosX, -dir.z / a.x, -dir.y / a.x)
        } else {
            (CubeFace::NegX, dir.z / a.x, -dir.y / a.x)
        }
    } else if a.y >= a.x && a.y >= a.z {
        if dir.y > 0.0 {
            (CubeFace::PosY, dir.x / a.y, dir.z / a.y)
        } else {
            (CubeFace::NegY, dir.x / a.y, -dir.z / a.y)
        }
    } else if dir.z > 0.0 {
        (CubeFace::PosZ, dir.x / a.z, -dir.y / a.z)
    } else {
        (CubeFace::NegZ, -dir.x / a.z, -dir.y / a.z)
    };

    let u = (s + 1.0) * 0.5;
    let v = (t + 1.0) * 0.5;

    (face, u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
}

/// Gnomonic projection of a direction onto one specific face's plane.
///
/// Unlike [`direction_to_face_uv`] the face is given, the UV is not clamped
/// (it can land outside [0, 1] when the direction points past the face
/// boundary), and `None` is returned for directions on or behind the face
/// plane. Billboard rasterization uses this to splat sprites that straddle
/// face edges consistently on both faces.
pub fn face_uv_unclamped(face: CubeFace, dir: Vec3) -> Option<(f32, f32)> {
    let (k, s, t) = match face {
        CubeFace::PosX => (dir.x, -dir.z, -dir.y),
        CubeFace::NegX => (-dir.x, dir.z, -dir.y),
        CubeFace::PosY => (dir.y, dir.x, dir.z),
        CubeFace::NegY => (-dir.y, dir.x, -dir.z),
        CubeFace::PosZ => (dir.z, dir.x, -dir.y),
        CubeFace::NegZ => (-dir.z, -dir.x, -dir.y),
    };

    if k <= 1e-6 {
        return None;
    }

    Some(((s / k + 1.0) * 0.5, (t / k + 1.0) * 0.5))
}
