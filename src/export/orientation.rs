//! Export orientation conventions.
//!
//! Renderers work in the canonical face layout; export targets differ in
//! how they name faces and which way each face is turned. A convention is a
//! table of six slots: which canonical face fills the slot, the quarter
//! turn applied to it, and the filename suffix.

use serde::{Deserialize, Serialize};

use crate::geometry::CubeFace;
use crate::render::Quarter;

/// Face naming/rotation convention of the export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportConvention {
    /// Canonical faces, `posx..negz` suffixes, no rotation.
    #[default]
    Default,
    /// Unreal-style Z-up layout.
    Unreal,
    /// Unity-style right/left/up/down/front/back naming.
    Unity,
    /// Source-engine `rt/lf/up/dn/ft/bk` naming.
    Source,
}

impl ExportConvention {
    pub fn name(self) -> &'static str {
        match self {
            ExportConvention::Default => "default",
            ExportConvention::Unreal => "unreal",
            ExportConvention::Unity => "unity",
            ExportConvention::Source => "source",
        }
    }

    pub fn from_name(name: &str) -> Option<ExportConvention> {
        match name {
            "default" => Some(ExportConvention::Default),
            "unreal" => Some(ExportConvention::Unreal),
            "unity" => Some(ExportConvention::Unity),
            "source" => Some(ExportConvention::Source),
            _ => None,
        }
    }
}

/// One output slot of a convention.
#[derive(Debug, Clone, Copy)]
pub struct FaceSlot {
    /// Canonical face that fills this slot.
    pub face: CubeFace,
    /// Quarter turn applied to the face image.
    pub rotation: Quarter,
    /// Filename suffix (six-file export) for this slot.
    pub suffix: &'static str,
}

const fn slot(face: CubeFace, rotation: Quarter, suffix: &'static str) -> FaceSlot {
    FaceSlot {
        face,
        rotation,
        suffix,
    }
}

/// The six output slots of a convention, in container order.
pub fn slots(convention: ExportConvention) -> [FaceSlot; 6] {
    match convention {
        ExportConvention::Default => [
            slot(CubeFace::PosX, Quarter::None, "posx"),
            slot(CubeFace::NegX, Quarter::None, "negx"),
            slot(CubeFace::PosY, Quarter::None, "posy"),
            slot(CubeFace::NegY, Quarter::None, "negy"),
            slot(CubeFace::PosZ, Quarter::None, "posz"),
            slot(CubeFace::NegZ, Quarter::None, "negz"),
        ],
        // Unreal is Z-up: the canonical vertical axis becomes the target's
        // Z, with the up/down faces turned to match.
        ExportConvention::Unreal => [
            slot(CubeFace::PosX, Quarter::None, "px"),
            slot(CubeFace::NegX, Quarter::None, "nx"),
            slot(CubeFace::PosZ, Quarter::None, "py"),
            slot(CubeFace::NegZ, Quarter::None, "ny"),
            slot(CubeFace::PosY, Quarter::Cw90, "pz"),
            slot(CubeFace::NegY, Quarter::Cw270, "nz"),
        ],
        // Unity keeps the canonical axes but expects the vertical faces
        // half-turned.
        ExportConvention::Unity => [
            slot(CubeFace::PosX, Quarter::None, "right"),
            slot(CubeFace::NegX, Quarter::None, "left"),
            slot(CubeFace::PosY, Quarter::Cw180, "up"),
            slot(CubeFace::NegY, Quarter::Cw180, "down"),
            slot(CubeFace::PosZ, Quarter::None, "front"),
            slot(CubeFace::NegZ, Quarter::None, "back"),
        ],
        ExportConvention::Source => [
            slot(CubeFace::PosX, Quarter::None, "rt"),
            slot(CubeFace::NegX, Quarter::None, "lf"),
            slot(CubeFace::PosY, Quarter::Cw90, "up"),
            slot(CubeFace::NegY, Quarter::Cw270, "dn"),
            slot(CubeFace::PosZ, Quarter::None, "ft"),
            slot(CubeFace::NegZ, Quarter::None, "bk"),
        ],
    }
}
