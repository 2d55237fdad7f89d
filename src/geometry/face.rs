//! Cube face identification and enumeration.

use serde::{Deserialize, Serialize};

/// Identifies one face of the skybox cube.
///
/// The numeric order (right, left, top, bottom, front, back) is also the
/// canonical face order used by renderers and the packed cube-map container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFace {
    /// +X face (right)
    PosX = 0,
    /// -X face (left)
    NegX = 1,
    /// +Y face (top)
    PosY = 2,
    /// -Y face (bottom)
    NegY = 3,
    /// +Z face (front)
    PosZ = 4,
    /// -Z face (back)
    NegZ = 5,
}

impl CubeFace {
    /// Returns all six cube faces in canonical order.
    pub const fn all() -> [CubeFace; 6] {
        [
            CubeFace::PosX,
            CubeFace::NegX,
            CubeFace::PosY,
            CubeFace::NegY,
            CubeFace::PosZ,
            CubeFace::NegZ,
        ]
    }

    /// Returns the face index (0-5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Creates a face from an index (0-5).
    pub const fn from_index(index: usize) -> Option<CubeFace> {
        match index {
            0 => Some(CubeFace::PosX),
            1 => Some(CubeFace::NegX),
            2 => Some(CubeFace::PosY),
            3 => Some(CubeFace::NegY),
            4 => Some(CubeFace::PosZ),
            5 => Some(CubeFace::NegZ),
            _ => None,
        }
    }

    /// Returns a short name for the face (e.g., "posx", "negy").
    pub const fn short_name(self) -> &'static str {
        match self {
            CubeFace::PosX => "posx",
            CubeFace::NegX => "negx",
            CubeFace::PosY => "posy",
            CubeFace::NegY => "negy",
            CubeFace::PosZ => "posz",
            CubeFace::NegZ => "negz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_faces() {
        let faces = CubeFace::all();
        assert_eq!(faces.len(), 6);
        for (i, face) in faces.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn test_from_index() {
        for i in 0..6 {
            let face = CubeFace::from_index(i).unwrap();
            assert_eq!(face.index(), i);
        }
        assert!(CubeFace::from_index(6).is_none());
    }

    #[test]
    fn test_short_names() {
        assert_eq!(CubeFace::PosX.short_name(), "posx");
        assert_eq!(CubeFace::NegY.short_name(), "negy");
    }
}
