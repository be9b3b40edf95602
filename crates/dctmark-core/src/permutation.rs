//! Seed-keyed permutations for cell shuffling.
//!
//! Shuffling spreads the watermark uniformly across the working grid, so a
//! local defect in the carrier degrades many bits a little instead of a few
//! bits fatally. The permutation is deterministic given the seed, which is the
//! only thing the extractor needs to undo it.

use fastrand::Rng;

/// A seed-keyed bijection over cell indices.
///
/// Built by without-replacement rejection sampling: indices are drawn from the
/// seeded generator and redrawn on collision until every destination has a
/// source. Embedding gathers through the mapping, extraction scatters back
/// through it; both sides derive the identical mapping from the seed because
/// they run the identical draw sequence.
#[derive(Debug, Clone)]
pub struct Permutation {
    /// `forward[dest] = source`: the cell gathered into `dest`.
    forward: Vec<usize>,
    /// `inverse[source] = dest`, the scatter direction.
    inverse: Vec<usize>,
}

impl Permutation {
    /// Derive the permutation over `len` cells from a 64-bit seed.
    pub fn from_seed(seed: u64, len: usize) -> Self {
        let mut rng = Rng::with_seed(seed);
        let mut taken = vec![false; len];
        let mut forward = Vec::with_capacity(len);

        for _ in 0..len {
            let source = loop {
                let candidate = rng.usize(0..len);
                if !taken[candidate] {
                    break candidate;
                }
            };
            taken[source] = true;
            forward.push(source);
        }

        let mut inverse = vec![0usize; len];
        for (dest, &source) in forward.iter().enumerate() {
            inverse[source] = dest;
        }

        Permutation { forward, inverse }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The source cell gathered into `dest`.
    #[inline]
    pub fn source(&self, dest: usize) -> usize {
        self.forward[dest]
    }

    /// Reorder `data` so that `out[dest] = data[source(dest)]`.
    pub fn gather(&self, data: &[i32]) -> Vec<i32> {
        assert_eq!(data.len(), self.len());
        self.forward.iter().map(|&source| data[source]).collect()
    }

    /// Undo [`gather`](Self::gather): `out[source(dest)] = data[dest]`.
    pub fn scatter(&self, data: &[i32]) -> Vec<i32> {
        assert_eq!(data.len(), self.len());
        let mut out = vec![0i32; data.len()];
        for (dest, &value) in data.iter().enumerate() {
            out[self.forward[dest]] = value;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_permutation() {
        let a = Permutation::from_seed(19, 256);
        let b = Permutation::from_seed(19, 256);
        for dest in 0..256 {
            assert_eq!(a.source(dest), b.source(dest));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = Permutation::from_seed(19, 256);
        let b = Permutation::from_seed(24, 256);
        let differing = (0..256).filter(|&d| a.source(d) != b.source(d)).count();
        assert!(differing > 128, "only {differing} positions differ");
    }

    #[test]
    fn is_a_bijection_for_any_seed() {
        for seed in [0u64, 1, 19, 24, 0xDEAD_BEEF, u64::MAX] {
            let p = Permutation::from_seed(seed, 1024);
            let mut seen = vec![false; 1024];
            for dest in 0..1024 {
                let source = p.source(dest);
                assert!(!seen[source], "seed {seed}: source {source} twice");
                seen[source] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn scatter_inverts_gather() {
        let p = Permutation::from_seed(42, 512);
        let data: Vec<i32> = (0..512).collect();
        let shuffled = p.gather(&data);
        assert_ne!(shuffled, data);
        assert_eq!(p.scatter(&shuffled), data);
    }

    #[test]
    fn gather_inverts_scatter() {
        let p = Permutation::from_seed(42, 512);
        let data: Vec<i32> = (0..512).rev().collect();
        assert_eq!(p.gather(&p.scatter(&data)), data);
    }

    #[test]
    fn full_grid_size_is_complete() {
        use crate::grid::GRID_CELLS;
        let p = Permutation::from_seed(7, GRID_CELLS);
        assert_eq!(p.len(), GRID_CELLS);
        let mut seen = vec![false; GRID_CELLS];
        for dest in 0..GRID_CELLS {
            seen[p.source(dest)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
