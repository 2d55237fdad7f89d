//! Improved Perlin noise over the seeded gradient table.

use glam::DVec3;

use super::permutation::PermutationTable;

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Floor that stays correct for negative inputs.
#[inline]
fn fast_floor(x: f64) -> i32 {
    if x >= 0.0 {
        x as i32
    } else {
        x as i32 - 1
    }
}

/// Gradient-dot-residual for one lattice corner.
///
/// The gradients are unit vectors rather than the classic cube-edge set, so
/// values land close to, but are not strictly bounded by, [-1, 1]. Callers
/// clamp or rescale downstream.
#[inline]
fn grad(table: &PermutationTable, hash: usize, residual: DVec3) -> f64 {
    table.gradient(hash).dot(residual)
}

/// Classic improved Perlin noise in 3D.
pub fn perlin3(table: &PermutationTable, x: f64, y: f64, z: f64) -> f64 {
    // Lattice cell and fractional offsets within it.
    let xi = fast_floor(x);
    let yi = fast_floor(y);
    let zi = fast_floor(z);
    let fx = x - xi as f64;
    let fy = y - yi as f64;
    let fz = z - zi as f64;

    let u = fade(fx);
    let v = fade(fy);
    let w = fade(fz);

    // Gradient-dot-residual at the eight cell corners.
    let corner = |dx: i32, dy: i32, dz: i32| -> f64 {
        let hash = table.hash3(xi + dx, yi + dy, zi + dz);
        grad(
            table,
            hash,
            DVec3::new(fx - dx as f64, fy - dy as f64, fz - dz as f64),
        )
    };

    let n000 = corner(0, 0, 0);
    let n100 = corner(1, 0, 0);
    let n010 = corner(0, 1, 0);
    let n110 = corner(1, 1, 0);
    let n001 = corner(0, 0, 1);
    let n101 = corner(1, 0, 1);
    let n011 = corner(0, 1, 1);
    let n111 = corner(1, 1, 1);

    let x00 = lerp(n000, n100, u);
    let x10 = lerp(n010, n110, u);
    let x01 = lerp(n001, n101, u);
    let x11 = lerp(n011, n111, u);

    let y0 = lerp(x00, x10, v);
    let y1 = lerp(x01, x11, v);

    lerp(y0, y1, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let table = PermutationTable::build(42);
        let a = perlin3(&table, 0.5, 1.3, -2.7);
        let b = perlin3(&table, 0.5, 1.3, -2.7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_at_lattice_points() {
        // The residual at an exact lattice corner is the zero vector, so the
        // interpolated value collapses to 0.
        let table = PermutationTable::build(42);
        for (x, y, z) in [(0.0, 0.0, 0.0), (1.0, 2.0, 3.0), (-4.0, 5.0, -6.0)] {
            assert!(perlin3(&table, x, y, z).abs() < 1e-12);
        }
    }

    #[test]
    fn test_range_is_reasonable() {
        let table = PermutationTable::build(7);
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for i in 0..2000 {
            let t = i as f64 * 0.173;
            let v = perlin3(&table, t, t * 0.7 + 1.1, t * 1.3 - 0.4);
            min = min.min(v);
            max = max.max(v);
        }
        assert!(min < 0.0 && max > 0.0, "noise should straddle zero");
        assert!(min > -2.0 && max < 2.0, "noise far outside nominal range");
    }

    #[test]
    fn test_different_seeds_decorrelate() {
        let a = PermutationTable::build(1);
        let b = PermutationTable::build(2);
        let va = perlin3(&a, 0.37, 0.81, 0.55);
        let vb = perlin3(&b, 0.37, 0.81, 0.55);
        assert_ne!(va, vb);
    }

    #[test]
    fn test_continuity_across_cell_boundary() {
        let table = PermutationTable::build(11);
        let eps = 1e-6;
        let before = perlin3(&table, 1.0 - eps, 0.4, 0.6);
        let after = perlin3(&table, 1.0 + eps, 0.4, 0.6);
        assert!((before - after).abs() < 1e-4);
    }
}
