//! Seeded permutation and gradient tables for lattice noise.

use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Permutation and gradient tables shared by the Perlin and simplex
/// evaluators.
///
/// The table is a pure function of the seed: the same seed always produces
/// the same permutation and the same gradients, which is what makes renders
/// and exports reproducible. Layers with different seeds never share a table.
#[derive(Clone)]
pub struct PermutationTable {
    /// Permutation of 0..=255, duplicated to 512 entries so lattice hashing
    /// never needs a modulo at sample boundaries.
    perm: [u8; 512],
    /// Pseudo-random unit gradient vectors, indexed by hashed lattice corner.
    gradients: [DVec3; 512],
}

impl PermutationTable {
    /// Builds the table for a seed. Never fails; any u32 is a valid seed.
    pub fn build(seed: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);

        // Fisher-Yates shuffle of the identity permutation.
        let mut source: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in (1..256usize).rev() {
            let j = rng.random_range(0..=i);
            source.swap(i, j);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&source);
        perm[256..].copy_from_slice(&source);

        // Uniformly distributed unit vectors for the gradient table.
        let mut gradients = [DVec3::ZERO; 512];
        for g in gradients.iter_mut() {
            let theta = rng.random::<f64>() * std::f64::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f64>()).acos();
            *g = DVec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );
        }

        Self { perm, gradients }
    }

    /// Hashes a 3D lattice coordinate into the gradient index space.
    #[inline]
    pub fn hash3(&self, x: i32, y: i32, z: i32) -> usize {
        let xi = (x & 255) as usize;
        let yi = (y & 255) as usize;
        let zi = (z & 255) as usize;
        self.perm[xi + self.perm[yi + self.perm[zi] as usize] as usize] as usize
    }

    /// Returns the gradient vector for a hashed index.
    #[inline]
    pub fn gradient(&self, hash: usize) -> DVec3 {
        self.gradients[hash & 511]
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_table() {
        let a = PermutationTable::build(42);
        let b = PermutationTable::build(42);
        assert_eq!(a.perm, b.perm);
        for i in 0..512 {
            assert_eq!(a.gradients[i], b.gradients[i]);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PermutationTable::build(1);
        let b = PermutationTable::build(2);
        assert_ne!(a.perm, b.perm);
    }

    #[test]
    fn test_table_is_doubled() {
        let table = PermutationTable::build(7);
        assert_eq!(table.perm[..256], table.perm[256..]);
    }

    #[test]
    fn test_permutation_is_bijective() {
        let table = PermutationTable::build(99);
        let mut seen = [false; 256];
        for &p in &table.perm[..256] {
            seen[p as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_gradients_are_unit_length() {
        let table = PermutationTable::build(1234);
        for &g in &table.gradients {
            assert!((g.length() - 1.0).abs() < 1e-9, "non-unit gradient {:?}", g);
        }
    }

    #[test]
    fn test_hash_stays_in_range() {
        let table = PermutationTable::build(5);
        for (x, y, z) in [(0, 0, 0), (-1, -2, -3), (255, 256, 257), (1 << 20, -(1 << 20), 12345)] {
            assert!(table.hash3(x, y, z) < 512);
        }
    }
}
