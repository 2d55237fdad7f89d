//! Strongly-typed layer parameters and the flat string-map adapter.
//!
//! The core works with typed structs; configuration files and editors see a
//! flat `key -> string value` view (see [`crate::config`]). Parsing is
//! fail-closed: unknown keys are ignored and malformed values fall back to
//! the current (default) value rather than producing an error.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Flat key/value view of a layer, as stored in configuration files.
pub type ParamMap = BTreeMap<String, String>;

/// RGBA color with components in [0, 1] (unclamped above 1 in HDR).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear interpolation; `t = 0` yields `self`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn scaled(self, s: f32) -> Rgba {
        Rgba::new(self.r * s, self.g * s, self.b * s, self.a * s)
    }

    /// Serializes as four space-separated floats, e.g. `"1 0.5 0 1"`.
    pub fn to_param(self) -> String {
        format!("{} {} {} {}", self.r, self.g, self.b, self.a)
    }

    /// Parses `"r g b a"` (alpha optional, defaults to 1). Returns `None`
    /// for malformed input so callers can fall back to a default.
    pub fn from_param(value: &str) -> Option<Rgba> {
        let parts: Vec<f32> = value
            .split_whitespace()
            .map(|p| p.parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Some(Rgba::new(*r, *g, *b, 1.0)),
            [r, g, b, a] => Some(Rgba::new(*r, *g, *b, *a)),
            _ => None,
        }
    }
}

/// Scene blend factor, applied per channel in the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendFactor {
    One,
    Zero,
    DestColor,
    SrcColor,
    OneMinusDestColor,
    OneMinusSrcColor,
    DestAlpha,
    SrcAlpha,
    OneMinusDestAlpha,
    OneMinusSrcAlpha,
}

impl BlendFactor {
    /// Serialized spelling, e.g. `"one_minus_src_alpha"`.
    pub fn name(self) -> &'static str {
        match self {
            BlendFactor::One => "one",
            BlendFactor::Zero => "zero",
            BlendFactor::DestColor => "dest_colour",
            BlendFactor::SrcColor => "src_colour",
            BlendFactor::OneMinusDestColor => "one_minus_dest_colour",
            BlendFactor::OneMinusSrcColor => "one_minus_src_colour",
            BlendFactor::DestAlpha => "dest_alpha",
            BlendFactor::SrcAlpha => "src_alpha",
            BlendFactor::OneMinusDestAlpha => "one_minus_dest_alpha",
            BlendFactor::OneMinusSrcAlpha => "one_minus_src_alpha",
        }
    }

    pub fn from_name(name: &str) -> Option<BlendFactor> {
        Some(match name {
            "one" => BlendFactor::One,
            "zero" => BlendFactor::Zero,
            "dest_colour" => BlendFactor::DestColor,
            "src_colour" => BlendFactor::SrcColor,
            "one_minus_dest_colour" => BlendFactor::OneMinusDestColor,
            "one_minus_src_colour" => BlendFactor::OneMinusSrcColor,
            "dest_alpha" => BlendFactor::DestAlpha,
            "src_alpha" => BlendFactor::SrcAlpha,
            "one_minus_dest_alpha" => BlendFactor::OneMinusDestAlpha,
            "one_minus_src_alpha" => BlendFactor::OneMinusSrcAlpha,
            _ => return None,
        })
    }

    /// Per-channel factor for a source/destination pixel pair.
    pub fn factor(self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        match self {
            BlendFactor::One => [1.0; 4],
            BlendFactor::Zero => [0.0; 4],
            BlendFactor::DestColor => dst,
            BlendFactor::SrcColor => src,
            BlendFactor::OneMinusDestColor => dst.map(|c| 1.0 - c),
            BlendFactor::OneMinusSrcColor => src.map(|c| 1.0 - c),
            BlendFactor::DestAlpha => [dst[3]; 4],
            BlendFactor::SrcAlpha => [src[3]; 4],
            BlendFactor::OneMinusDestAlpha => [1.0 - dst[3]; 4],
            BlendFactor::OneMinusSrcAlpha => [1.0 - src[3]; 4],
        }
    }
}

/// Source/destination blend factor pair for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendPair {
    pub source: BlendFactor,
    pub dest: BlendFactor,
}

impl Default for BlendPair {
    /// Additive blending, the classic look for layered space imagery.
    fn default() -> Self {
        Self {
            source: BlendFactor::One,
            dest: BlendFactor::One,
        }
    }
}

/// Base noise function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseMode {
    #[default]
    Fbm,
    Ridged,
}

impl NoiseMode {
    pub fn name(self) -> &'static str {
        match self {
            NoiseMode::Fbm => "fbm",
            NoiseMode::Ridged => "ridged",
        }
    }

    pub fn from_name(name: &str) -> Option<NoiseMode> {
        match name {
            "fbm" => Some(NoiseMode::Fbm),
            "ridged" => Some(NoiseMode::Ridged),
            _ => None,
        }
    }
}

/// Noise shaping parameters, used by noise sheets and their optional masks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Number of octaves; more octaves add detail at render cost.
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub gain: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Initial coordinate multiplier applied to the unit direction.
    pub scale: f32,
    /// Ridge-function parameter; only the ridged mode reads it.
    pub offset: f32,
    /// Final exponent shaping.
    pub power: f32,
    /// Lower shelf: values below are cut to zero, the rest rescaled.
    pub threshold: f32,
    /// Per-texel uniform perturbation amount.
    pub dither: f32,
    /// Color at full noise value.
    pub inner_color: Rgba,
    /// Color at zero noise value.
    pub outer_color: Rgba,
    pub mode: NoiseMode,
    /// Exponent applied to the scalar in HDR mode only.
    pub hdr_power: f32,
    /// Multiplier applied to the final color in HDR mode only.
    pub hdr_multiplier: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            gain: 0.5,
            lacunarity: 2.0,
            scale: 1.0,
            offset: 1.0,
            power: 1.0,
            threshold: 0.0,
            dither: 0.0,
            inner_color: Rgba::WHITE,
            outer_color: Rgba::BLACK,
            mode: NoiseMode::Fbm,
            hdr_power: 1.0,
            hdr_multiplier: 1.0,
        }
    }
}

/// Parameters for a noise-sheet layer: the main noise block plus an
/// optional mask block that modulates opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseSheetParams {
    pub noise: NoiseParams,
    pub mask_enabled: bool,
    /// The mask has its own seed so it never correlates with the main sheet.
    pub mask_seed: u32,
    pub mask: NoiseParams,
}

impl Default for NoiseSheetParams {
    fn default() -> Self {
        Self {
            noise: NoiseParams::default(),
            mask_enabled: false,
            mask_seed: 1,
            mask: NoiseParams::default(),
        }
    }
}

/// Parameters for a point-star layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFieldParams {
    /// Optional star catalog CSV; when absent, `num_points` stars are
    /// placed procedurally from the layer seed.
    pub data_file: Option<PathBuf>,
    pub num_points: u32,
    /// Point diameter in texels at the export resolution.
    pub point_size: u32,
    /// Color modulation for the nearest stars.
    pub near_color: Rgba,
    /// Color modulation for the farthest stars.
    pub far_color: Rgba,
}

impl Default for PointFieldParams {
    fn default() -> Self {
        Self {
            data_file: None,
            num_points: 1000,
            point_size: 1,
            near_color: Rgba::WHITE,
            far_color: Rgba::WHITE,
        }
    }
}

/// Parameters for a billboard-sprite layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillboardFieldParams {
    pub num_billboards: u32,
    /// Apparent size of the farthest billboards, as a fraction of the face.
    pub min_size: f32,
    /// Apparent size of the nearest billboards, as a fraction of the face.
    pub max_size: f32,
    /// Sprite image path; a soft procedural flare is used when absent.
    pub texture: Option<PathBuf>,
}

impl Default for BillboardFieldParams {
    fn default() -> Self {
        Self {
            num_billboards: 100,
            min_size: 0.01,
            max_size: 0.05,
            texture: None,
        }
    }
}

/// Layer kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    Points,
    Billboards,
    Noise,
}

impl LayerKind {
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Points => "points",
            LayerKind::Billboards => "billboards",
            LayerKind::Noise => "noise",
        }
    }

    pub fn from_name(name: &str) -> Option<LayerKind> {
        match name {
            "points" => Some(LayerKind::Points),
            "billboards" => Some(LayerKind::Billboards),
            "noise" => Some(LayerKind::Noise),
            _ => None,
        }
    }
}

/// Kind-specific parameter payload; the tag is the layer kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerParams {
    Points(PointFieldParams),
    Billboards(BillboardFieldParams),
    Noise(NoiseSheetParams),
}

impl LayerParams {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerParams::Points(_) => LayerKind::Points,
            LayerParams::Billboards(_) => LayerKind::Billboards,
            LayerParams::Noise(_) => LayerKind::Noise,
        }
    }

    /// Default parameters for a kind.
    pub fn defaults(kind: LayerKind) -> LayerParams {
        match kind {
            LayerKind::Points => LayerParams::Points(PointFieldParams::default()),
            LayerKind::Billboards => LayerParams::Billboards(BillboardFieldParams::default()),
            LayerKind::Noise => LayerParams::Noise(NoiseSheetParams::default()),
        }
    }

    /// Applies kind-specific keys from a flat map; unknown keys are ignored
    /// and malformed values leave the current value untouched.
    pub fn apply(&mut self, map: &ParamMap) {
        match self {
            LayerParams::Points(p) => {
                if let Some(v) = map.get("dataFile") {
                    p.data_file = if v.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(v))
                    };
                }
                apply_u32(map, "numPoints", &mut p.num_points);
                apply_u32(map, "pointSize", &mut p.point_size);
                apply_color(map, "nearColor", &mut p.near_color);
                apply_color(map, "farColor", &mut p.far_color);
            }
            LayerParams::Billboards(p) => {
                apply_u32(map, "numBillboards", &mut p.num_billboards);
                apply_f32(map, "minSize", &mut p.min_size);
                apply_f32(map, "maxSize", &mut p.max_size);
                if let Some(v) = map.get("texture") {
                    p.texture = if v.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(v))
                    };
                }
            }
            LayerParams::Noise(p) => {
                apply_noise_block(map, &mut p.noise, NOISE_KEYS);
                apply_bool(map, "maskEnabled", &mut p.mask_enabled);
                apply_u32(map, "maskSeed", &mut p.mask_seed);
                apply_noise_block(map, &mut p.mask, MASK_KEYS);
            }
        }
    }

    /// Emits kind-specific keys into a flat map.
    pub fn emit(&self, map: &mut ParamMap) {
        match self {
            LayerParams::Points(p) => {
                if let Some(path) = &p.data_file {
                    map.insert("dataFile".into(), path.display().to_string());
                }
                map.insert("numPoints".into(), p.num_points.to_string());
                map.insert("pointSize".into(), p.point_size.to_string());
                map.insert("nearColor".into(), p.near_color.to_param());
                map.insert("farColor".into(), p.far_color.to_param());
            }
            LayerParams::Billboards(p) => {
                map.insert("numBillboards".into(), p.num_billboards.to_string());
                map.insert("minSize".into(), p.min_size.to_string());
                map.insert("maxSize".into(), p.max_size.to_string());
                if let Some(path) = &p.texture {
                    map.insert("texture".into(), path.display().to_string());
                }
            }
            LayerParams::Noise(p) => {
                emit_noise_block(map, &p.noise, NOISE_KEYS);
                map.insert("maskEnabled".into(), p.mask_enabled.to_string());
                map.insert("maskSeed".into(), p.mask_seed.to_string());
                emit_noise_block(map, &p.mask, MASK_KEYS);
            }
        }
    }
}

/// Key spellings for one noise block (main sheet or mask).
struct NoiseKeys {
    octaves: &'static str,
    gain: &'static str,
    lacunarity: &'static str,
    scale: &'static str,
    offset: &'static str,
    power: &'static str,
    threshold: &'static str,
    dither: &'static str,
    inner_color: &'static str,
    outer_color: &'static str,
    mode: &'static str,
    hdr_power: &'static str,
    hdr_multiplier: &'static str,
}

const NOISE_KEYS: &NoiseKeys = &NoiseKeys {
    octaves: "octaves",
    gain: "gain",
    lacunarity: "lacunarity",
    scale: "scale",
    offset: "offset",
    power: "powerAmount",
    threshold: "shelfAmount",
    dither: "ditherAmount",
    inner_color: "innerColor",
    outer_color: "outerColor",
    mode: "noiseType",
    hdr_power: "hdrPower",
    hdr_multiplier: "hdrMultiplier",
};

const MASK_KEYS: &NoiseKeys = &NoiseKeys {
    octaves: "maskOctaves",
    gain: "maskGain",
    lacunarity: "maskLacunarity",
    scale: "maskScale",
    offset: "maskOffset",
    power: "maskPower",
    threshold: "maskThreshold",
    dither: "maskDitherAmount",
    inner_color: "maskInnerColor",
    outer_color: "maskOuterColor",
    mode: "maskNoiseType",
    hdr_power: "maskHdrPower",
    hdr_multiplier: "maskHdrMultiplier",
};

fn apply_noise_block(map: &ParamMap, params: &mut NoiseParams, keys: &NoiseKeys) {
    apply_u32(map, keys.octaves, &mut params.octaves);
    apply_f32(map, keys.gain, &mut params.gain);
    apply_f32(map, keys.lacunarity, &mut params.lacunarity);
    apply_f32(map, keys.scale, &mut params.scale);
    apply_f32(map, keys.offset, &mut params.offset);
    apply_f32(map, keys.power, &mut params.power);
    apply_f32(map, keys.threshold, &mut params.threshold);
    apply_f32(map, keys.dither, &mut params.dither);
    apply_color(map, keys.inner_color, &mut params.inner_color);
    apply_color(map, keys.outer_color, &mut params.outer_color);
    if let Some(mode) = map.get(keys.mode).and_then(|v| NoiseMode::from_name(v)) {
        params.mode = mode;
    }
    apply_f32(map, keys.hdr_power, &mut params.hdr_power);
    apply_f32(map, keys.hdr_multiplier, &mut params.hdr_multiplier);
}

fn emit_noise_block(map: &mut ParamMap, params: &NoiseParams, keys: &NoiseKeys) {
    map.insert(keys.octaves.into(), params.octaves.to_string());
    map.insert(keys.gain.into(), params.gain.to_string());
    map.insert(keys.lacunarity.into(), params.lacunarity.to_string());
    map.insert(keys.scale.into(), params.scale.to_string());
    map.insert(keys.offset.into(), params.offset.to_string());
    map.insert(keys.power.into(), params.power.to_string());
    map.insert(keys.threshold.into(), params.threshold.to_string());
    map.insert(keys.dither.into(), params.dither.to_string());
    map.insert(keys.inner_color.into(), params.inner_color.to_param());
    map.insert(keys.outer_color.into(), params.outer_color.to_param());
    map.insert(keys.mode.into(), params.mode.name().into());
    map.insert(keys.hdr_power.into(), params.hdr_power.to_string());
    map.insert(keys.hdr_multiplier.into(), params.hdr_multiplier.to_string());
}

pub(crate) fn apply_f32(map: &ParamMap, key: &str, slot: &mut f32) {
    if let Some(v) = map.get(key).and_then(|v| v.parse::<f32>().ok()) {
        *slot = v;
    }
}

pub(crate) fn apply_u32(map: &ParamMap, key: &str, slot: &mut u32) {
    if let Some(v) = map.get(key).and_then(|v| v.parse::<u32>().ok()) {
        *slot = v;
    }
}

pub(crate) fn apply_bool(map: &ParamMap, key: &str, slot: &mut bool) {
    if let Some(v) = map.get(key).and_then(|v| v.parse::<bool>().ok()) {
        *slot = v;
    }
}

pub(crate) fn apply_color(map: &ParamMap, key: &str, slot: &mut Rgba) {
    if let Some(v) = map.get(key).and_then(|v| Rgba::from_param(v)) {
        *slot = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_param_roundtrip() {
        let c = Rgba::new(0.25, 0.5, 0.75, 1.0);
        let parsed = Rgba::from_param(&c.to_param()).unwrap();
        assert_eq!(c, parsed);
    }

    #[test]
    fn test_color_parse_three_components() {
        let c = Rgba::from_param("1 0.5 0").unwrap();
        assert_eq!(c, Rgba::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn test_color_parse_malformed() {
        assert!(Rgba::from_param("red").is_none());
        assert!(Rgba::from_param("1 2").is_none());
        assert!(Rgba::from_param("").is_none());
    }

    #[test]
    fn test_blend_factor_names_roundtrip() {
        let all = [
            BlendFactor::One,
            BlendFactor::Zero,
            BlendFactor::DestColor,
            BlendFactor::SrcColor,
            BlendFactor::OneMinusDestColor,
            BlendFactor::OneMinusSrcColor,
            BlendFactor::DestAlpha,
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusDestAlpha,
            BlendFactor::OneMinusSrcAlpha,
        ];
        for f in all {
            assert_eq!(BlendFactor::from_name(f.name()), Some(f));
        }
        assert_eq!(BlendFactor::from_name("multiply"), None);
    }

    #[test]
    fn test_apply_is_fail_closed() {
        let mut params = LayerParams::defaults(LayerKind::Noise);
        let mut map = ParamMap::new();
        map.insert("octaves".into(), "not-a-number".into());
        map.insert("gain".into(), "0.75".into());
        map.insert("someUnknownKey".into(), "whatever".into());
        params.apply(&map);

        let LayerParams::Noise(sheet) = &params else {
            panic!("kind changed")
        };
        assert_eq!(sheet.noise.octaves, 4, "malformed value must keep default");
        assert_eq!(sheet.noise.gain, 0.75);
    }

    #[test]
    fn test_emit_apply_roundtrip_noise() {
        let mut original = NoiseSheetParams::default();
        original.noise.octaves = 7;
        original.noise.mode = NoiseMode::Ridged;
        original.noise.inner_color = Rgba::new(0.2, 0.4, 0.9, 1.0);
        original.mask_enabled = true;
        original.mask_seed = 77;
        original.mask.scale = 3.0;

        let params = LayerParams::Noise(original.clone());
        let mut map = ParamMap::new();
        params.emit(&mut map);

        let mut restored = LayerParams::defaults(LayerKind::Noise);
        restored.apply(&map);
        assert_eq!(restored, params);
    }

    #[test]
    fn test_emit_apply_roundtrip_points_and_billboards() {
        let mut p = PointFieldParams::default();
        p.num_points = 4321;
        p.point_size = 2;
        p.far_color = Rgba::new(0.5, 0.5, 1.0, 1.0);
        let params = LayerParams::Points(p);
        let mut map = ParamMap::new();
        params.emit(&mut map);
        let mut restored = LayerParams::defaults(LayerKind::Points);
        restored.apply(&map);
        assert_eq!(restored, params);

        let mut b = BillboardFieldParams::default();
        b.num_billboards = 12;
        b.max_size = 0.2;
        b.texture = Some(PathBuf::from("flare.png"));
        let params = LayerParams::Billboards(b);
        let mut map = ParamMap::new();
        params.emit(&mut map);
        let mut restored = LayerParams::defaults(LayerKind::Billboards);
        restored.apply(&map);
        assert_eq!(restored, params);
    }
}
