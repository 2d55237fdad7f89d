//! Star catalogs and star coloring.
//!
//! A point-field layer draws either a catalog loaded from a CSV data file or
//! a procedurally placed catalog generated from the layer seed. Star color
//! comes from the B−V color index through a fixed piecewise ramp.

use std::io::BufRead;
use std::path::Path;

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use super::params::Rgba;

/// Errors that can occur while loading a star catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog '{0}' contains no usable records")]
    Empty(String),
}

/// One star: a direction on the sky sphere plus photometric data.
#[derive(Debug, Clone, Copy)]
pub struct StarRecord {
    /// Unit direction on the sky sphere.
    pub direction: Vec3,
    /// Normalized distance in [0, 1]; 0 is nearest.
    pub distance: f32,
    /// Apparent magnitude; smaller is brighter.
    pub magnitude: f32,
    /// B−V color index, clamped to [-0.4, 2.0] at lookup time.
    pub bv: f32,
}

/// A set of stars to rasterize.
#[derive(Debug, Clone, Default)]
pub struct StarCatalog {
    pub stars: Vec<StarRecord>,
}

impl StarCatalog {
    /// Loads a CSV catalog: one `x,y,z,distance,magnitude,bv` record per
    /// line. Blank lines, `#` comments and malformed lines are skipped;
    /// distances are normalized into [0, 1].
    pub fn load_csv(path: &Path) -> Result<StarCatalog, CatalogError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);

        let mut stars = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let fields: Vec<f32> = trimmed
                .split(',')
                .map(|f| f.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .unwrap_or_default();
            let [x, y, z, distance, magnitude, bv] = fields.as_slice() else {
                continue;
            };
            let direction = Vec3::new(*x, *y, *z);
            if direction.length_squared() < 1e-12 {
                continue;
            }
            stars.push(StarRecord {
                direction: direction.normalize(),
                distance: *distance,
                magnitude: *magnitude,
                bv: *bv,
            });
        }

        if stars.is_empty() {
            return Err(CatalogError::Empty(path.display().to_string()));
        }

        normalize_distances(&mut stars);
        Ok(StarCatalog { stars })
    }

    /// Generates a deterministic catalog from a seed: uniform directions on
    /// the sphere, power-law brightness (many dim stars, few bright ones),
    /// color indices across the whole B−V range.
    pub fn procedural(seed: u32, count: u32) -> StarCatalog {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        let mut stars = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
            let direction = Vec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );

            let distance = rng.random::<f32>();
            // Power-law brightness mapped back to a magnitude so catalog and
            // procedural stars go through the same shading path.
            let brightness = rng.random::<f32>().powf(4.0).max(1e-4);
            let magnitude = -2.5 * brightness.log10();
            let bv = -0.4 + rng.random::<f32>() * 2.4;

            stars.push(StarRecord {
                direction,
                distance,
                magnitude,
                bv,
            });
        }

        StarCatalog { stars }
    }

    /// Magnitude of the brightest star, used as the luminance reference.
    pub fn min_magnitude(&self) -> f32 {
        self.stars
            .iter()
            .map(|s| s.magnitude)
            .fold(f32::INFINITY, f32::min)
    }
}

fn normalize_distances(stars: &mut [StarRecord]) {
    let max = stars.iter().map(|s| s.distance).fold(0.0f32, f32::max);
    if max > 0.0 {
        for star in stars {
            star.distance = (star.distance / max).clamp(0.0, 1.0);
        }
    }
}

/// Maps a B−V color index to RGB through the fixed piecewise ramp.
///
/// The index is clamped to [-0.4, 2.0]. Breakpoints and coefficients follow
/// the reference star-coloring curve; endpoints are (0.61, 0.70, 1.00) at
/// -0.4 and (1.00, 0.32, 0.03) at 2.0, and every segment joins its neighbor
/// continuously.
pub fn bv_to_rgb(bv: f32) -> Rgba {
    let bv = bv.clamp(-0.4, 2.0);

    let r = if bv < 0.0 {
        let t = (bv + 0.40) / 0.40;
        0.61 + 0.11 * t + 0.1 * t * t
    } else if bv < 0.40 {
        let t = bv / 0.40;
        0.83 + 0.17 * t
    } else {
        1.0
    };

    let g = if bv < 0.0 {
        let t = (bv + 0.40) / 0.40;
        0.70 + 0.07 * t + 0.1 * t * t
    } else if bv < 0.40 {
        let t = bv / 0.40;
        0.87 + 0.11 * t
    } else if bv < 1.60 {
        let t = (bv - 0.40) / 1.20;
        0.98 - 0.16 * t
    } else {
        let t = (bv - 1.60) / 0.40;
        0.82 - 0.5 * t * t
    };

    let b = if bv < 0.40 {
        1.0
    } else if bv < 1.50 {
        let t = (bv - 0.40) / 1.10;
        1.00 - 0.47 * t + 0.1 * t * t
    } else if bv < 1.94 {
        let t = (bv - 1.50) / 0.44;
        0.63 - 0.6 * t * t
    } else {
        0.03
    };

    Rgba::new(r, g, b, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bv_ramp_endpoints() {
        let cold = bv_to_rgb(2.0);
        assert!((cold.r - 1.0).abs() < 1e-6);
        assert!((cold.g - 0.32).abs() < 1e-6);
        assert!((cold.b - 0.03).abs() < 1e-2);

        let hot = bv_to_rgb(-0.4);
        assert!((hot.r - 0.61).abs() < 1e-6);
        assert!((hot.g - 0.70).abs() < 1e-6);
        assert!((hot.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bv_ramp_clamps_out_of_range() {
        assert_eq!(bv_to_rgb(-5.0), bv_to_rgb(-0.4));
        assert_eq!(bv_to_rgb(9.0), bv_to_rgb(2.0));
    }

    #[test]
    fn test_bv_ramp_continuous_at_breakpoints() {
        let eps = 1e-4;
        for bp in [0.0f32, 0.40, 1.50, 1.60, 1.94] {
            let lo = bv_to_rgb(bp - eps);
            let hi = bv_to_rgb(bp + eps);
            assert!((lo.r - hi.r).abs() < 1e-2, "r jump at {}", bp);
            assert!((lo.g - hi.g).abs() < 1e-2, "g jump at {}", bp);
            assert!((lo.b - hi.b).abs() < 1e-2, "b jump at {}", bp);
        }
    }

    #[test]
    fn test_bv_ramp_solar_color_is_warm_white() {
        // The Sun sits near B-V 0.65: nearly white, slightly warm.
        let sun = bv_to_rgb(0.65);
        assert!(sun.r > 0.95);
        assert!(sun.g > 0.9);
        assert!(sun.b > 0.8 && sun.b < 1.0);
    }

    #[test]
    fn test_procedural_catalog_is_deterministic() {
        let a = StarCatalog::procedural(42, 100);
        let b = StarCatalog::procedural(42, 100);
        assert_eq!(a.stars.len(), 100);
        for (x, y) in a.stars.iter().zip(b.stars.iter()) {
            assert_eq!(x.direction, y.direction);
            assert_eq!(x.magnitude, y.magnitude);
        }

        let c = StarCatalog::procedural(43, 100);
        assert_ne!(a.stars[0].direction, c.stars[0].direction);
    }

    #[test]
    fn test_procedural_directions_are_unit() {
        let catalog = StarCatalog::procedural(7, 500);
        for star in &catalog.stars {
            assert!((star.direction.length() - 1.0).abs() < 1e-5);
            assert!((0.0..=1.0).contains(&star.distance));
            assert!((-0.4..=2.0).contains(&star.bv));
        }
    }

    #[test]
    fn test_load_csv_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stars.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# direction xyz, distance, magnitude, bv").unwrap();
        writeln!(file, "1, 0, 0, 10.0, 1.5, 0.65").unwrap();
        writeln!(file, "not,a,star").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "0, 1, 0, 5.0, 3.0, -0.2").unwrap();
        drop(file);

        let catalog = StarCatalog::load_csv(&path).unwrap();
        assert_eq!(catalog.stars.len(), 2);
        // Distances normalized by the maximum.
        assert!((catalog.stars[0].distance - 1.0).abs() < 1e-6);
        assert!((catalog.stars[1].distance - 0.5).abs() < 1e-6);
        assert_eq!(catalog.min_magnitude(), 1.5);
    }

    #[test]
    fn test_load_csv_empty_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "# nothing here\n").unwrap();
        assert!(matches!(
            StarCatalog::load_csv(&path),
            Err(CatalogError::Empty(_))
        ));
    }
}
