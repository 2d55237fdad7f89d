//! Skybox configuration files.
//!
//! A configuration is a JSON array of flat string→string maps, one per
//! layer. File order is the z-order, farthest first: record 0 is painted
//! first and sits farthest away. The kind discriminator lives under the
//! `type` key (`points`, `billboards`, `noise`); all other keys fall back
//! to documented defaults when missing or malformed.

use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::layers::{LayerKind, ParamMap};
use crate::skybox::Skybox;

/// Errors that can occur while loading or saving a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a skybox from a configuration file.
///
/// Records with a missing or unknown `type` are skipped with a warning
/// rather than failing the whole load.
pub fn load_skybox(path: &Path) -> Result<Skybox, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<ParamMap> = serde_json::from_str(&text)?;

    let mut skybox = Skybox::new();
    for (index, record) in records.iter().enumerate() {
        let kind = record.get("type").and_then(|v| LayerKind::from_name(v));
        let Some(kind) = kind else {
            warn!(index, "skipping layer record with missing or unknown type");
            continue;
        };
        let id = skybox.add_layer(kind);
        skybox.update_layer(id, record);
    }

    Ok(skybox)
}

/// Saves a skybox to a configuration file, farthest layer first.
pub fn save_skybox(skybox: &Skybox, path: &Path) -> Result<(), ConfigError> {
    let records: Vec<ParamMap> = skybox.layers().iter().map(|l| l.to_params()).collect();
    let text = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{LayerParams, NoiseMode, Rgba};

    fn sample_skybox() -> Skybox {
        let mut skybox = Skybox::new();

        let noise = skybox.add_layer(LayerKind::Noise);
        {
            let layer = skybox.layer_mut(noise).unwrap();
            layer.name = "nebula".into();
            layer.seed = 1234;
            let LayerParams::Noise(sheet) = &mut layer.params else {
                panic!("wrong kind")
            };
            sheet.noise.octaves = 6;
            sheet.noise.mode = NoiseMode::Ridged;
            sheet.noise.inner_color = Rgba::new(0.8, 0.3, 0.9, 1.0);
            sheet.mask_enabled = true;
        }

        let points = skybox.add_layer(LayerKind::Points);
        {
            let layer = skybox.layer_mut(points).unwrap();
            layer.name = "stars".into();
            layer.visible = false;
        }

        skybox
    }

    #[test]
    fn test_save_load_roundtrip_preserves_layers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skybox.json");

        let original = sample_skybox();
        save_skybox(&original, &path).unwrap();
        let loaded = load_skybox(&path).unwrap();

        assert_eq!(loaded.layers().len(), original.layers().len());
        for (a, b) in loaded.layers().iter().zip(original.layers().iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.visible, b.visible);
            assert_eq!(a.seed, b.seed);
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.params, b.params);
        }
    }

    #[test]
    fn test_file_order_is_z_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skybox.json");

        save_skybox(&sample_skybox(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let records: Vec<ParamMap> = serde_json::from_str(&text).unwrap();

        // First record is the farthest layer (z-order 0).
        assert_eq!(records[0].get("name").unwrap(), "nebula");
        assert_eq!(records[1].get("name").unwrap(), "stars");
    }

    #[test]
    fn test_unknown_kind_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skybox.json");
        std::fs::write(
            &path,
            r#"[
                {"type": "hologram", "name": "future tech"},
                {"name": "typeless"},
                {"type": "points", "name": "kept"}
            ]"#,
        )
        .unwrap();

        let skybox = load_skybox(&path).unwrap();
        assert_eq!(skybox.layers().len(), 1);
        assert_eq!(skybox.layers().iter().next().unwrap().name, "kept");
    }

    #[test]
    fn test_malformed_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skybox.json");
        std::fs::write(
            &path,
            r#"[{"type": "noise", "octaves": "many", "gain": "0.7", "seed": "nine"}]"#,
        )
        .unwrap();

        let skybox = load_skybox(&path).unwrap();
        let layer = skybox.layers().iter().next().unwrap();
        let LayerParams::Noise(sheet) = &layer.params else {
            panic!("wrong kind")
        };
        assert_eq!(sheet.noise.octaves, 4, "default octaves kept");
        assert!((sheet.noise.gain - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_skybox(Path::new("/nonexistent/skybox.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{{{{").unwrap();
        assert!(matches!(load_skybox(&path), Err(ConfigError::Json(_))));
    }
}
