//! Seeded noise generation.
//!
//! A [`PermutationTable`] is built per seed; the Perlin and simplex
//! evaluators hash lattice coordinates through it, and the fractal
//! combinators stack octaves on top of either base function.

mod fractal;
mod permutation;
mod perlin;
mod simplex;

pub use fractal::{fbm, fbm_normalized, ridge, ridged_fbm, NoiseFn};
pub use permutation::PermutationTable;
pub use perlin::perlin3;
pub use simplex::simplex3;
