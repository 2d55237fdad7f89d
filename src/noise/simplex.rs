//! 3D simplex noise over the seeded gradient table.

use glam::DVec3;

use super::permutation::PermutationTable;

// Skew/unskew constants for 3D.
const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

#[inline]
fn fast_floor(x: f64) -> i32 {
    if x >= 0.0 {
        x as i32
    } else {
        x as i32 - 1
    }
}

/// Radial falloff contribution from one simplex corner.
#[inline]
fn contribution(table: &PermutationTable, hash: usize, d: DVec3) -> f64 {
    let t = 0.6 - d.length_squared();
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * table.gradient(hash).dot(d)
    }
}

/// 3D simplex noise; same domain/range contract as [`perlin3`].
///
/// [`perlin3`]: super::perlin3
pub fn simplex3(table: &PermutationTable, x: f64, y: f64, z: f64) -> f64 {
    // Skew input space to determine the containing simplex cell.
    let s = (x + y + z) * F3;
    let i = fast_floor(x + s);
    let j = fast_floor(y + s);
    let k = fast_floor(z + s);

    // Unskew back to get the distance from the cell origin.
    let t = (i + j + k) as f64 * G3;
    let x0 = x - (i as f64 - t);
    let y0 = y - (j as f64 - t);
    let z0 = z - (k as f64 - t);

    // Rank the fractional coordinates to pick the simplex traversal order.
    let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
        if y0 >= z0 {
            (1, 0, 0, 1, 1, 0)
        } else if x0 >= z0 {
            (1, 0, 0, 1, 0, 1)
        } else {
            (0, 0, 1, 1, 0, 1)
        }
    } else if y0 < z0 {
        (0, 0, 1, 0, 1, 1)
    } else if x0 < z0 {
        (0, 1, 0, 0, 1, 1)
    } else {
        (0, 1, 0, 1, 1, 0)
    };

    let d0 = DVec3::new(x0, y0, z0);
    let d1 = DVec3::new(
        x0 - i1 as f64 + G3,
        y0 - j1 as f64 + G3,
        z0 - k1 as f64 + G3,
    );
    let d2 = DVec3::new(
        x0 - i2 as f64 + 2.0 * G3,
        y0 - j2 as f64 + 2.0 * G3,
        z0 - k2 as f64 + 2.0 * G3,
    );
    let d3 = DVec3::new(x0 - 1.0 + 3.0 * G3, y0 - 1.0 + 3.0 * G3, z0 - 1.0 + 3.0 * G3);

    let n0 = contribution(table, table.hash3(i, j, k), d0);
    let n1 = contribution(table, table.hash3(i + i1, j + j1, k + k1), d1);
    let n2 = contribution(table, table.hash3(i + i2, j + j2, k + k2), d2);
    let n3 = contribution(table, table.hash3(i + 1, j + 1, k + 1), d3);

    // Scale so the output occupies roughly [-1, 1].
    32.0 * (n0 + n1 + n2 + n3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let table = PermutationTable::build(42);
        let a = simplex3(&table, 0.5, 1.3, -2.7);
        let b = simplex3(&table, 0.5, 1.3, -2.7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_range_is_reasonable() {
        let table = PermutationTable::build(3);
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for i in 0..2000 {
            let t = i as f64 * 0.211;
            let v = simplex3(&table, t, t * 0.9 - 0.3, t * 0.5 + 2.0);
            min = min.min(v);
            max = max.max(v);
        }
        assert!(min < 0.0 && max > 0.0);
        assert!(min > -2.0 && max < 2.0);
    }

    #[test]
    fn test_differs_from_perlin() {
        let table = PermutationTable::build(42);
        let p = super::super::perlin3(&table, 0.37, 0.81, 0.55);
        let s = simplex3(&table, 0.37, 0.81, 0.55);
        assert_ne!(p, s);
    }
}
