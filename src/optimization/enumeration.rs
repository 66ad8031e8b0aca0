//! Mixed-radix enumeration of catalog substitutions
//!
//! A candidate is the tuple (driving diameter, driven diameter, bearing 1,
//! bearing 2). Linear index `k` decodes with bearing 2 varying fastest and
//! the driving diameter slowest, so truncating the index range keeps the
//! same prefix a nested loop would visit.

use crate::types::Catalog;

/// Catalog positions chosen for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateIndex {
    pub driving: usize,
    pub driven: usize,
    pub bearing_1: usize,
    pub bearing_2: usize,
}

/// Shape of the Cartesian product over a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpace {
    diameters: usize,
    bearings: usize,
}

impl CandidateSpace {
    pub fn new(diameters: usize, bearings: usize) -> Self {
        Self {
            diameters,
            bearings,
        }
    }

    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.pulley_diameters.len(), catalog.bearings.len())
    }

    /// Size of the full product, saturating on overflow.
    pub fn total(&self) -> u64 {
        let d = self.diameters as u64;
        let b = self.bearings as u64;
        d.saturating_mul(d)
            .saturating_mul(b)
            .saturating_mul(b)
    }

    /// Number of indices visited under `cap`.
    pub fn capped(&self, cap: usize) -> usize {
        self.total().min(cap as u64) as usize
    }

    /// Decode linear index `k` (must be `< total()`).
    pub fn decode(&self, k: usize) -> CandidateIndex {
        let mut rest = k;
        let bearing_2 = rest % self.bearings;
        rest /= self.bearings;
        let bearing_1 = rest % self.bearings;
        rest /= self.bearings;
        let driven = rest % self.diameters;
        rest /= self.diameters;
        CandidateIndex {
            driving: rest,
            driven,
            bearing_1,
            bearing_2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_cap() {
        let space = CandidateSpace::new(3, 2);
        assert_eq!(space.total(), 36);
        assert_eq!(space.capped(2000), 36);
        assert_eq!(space.capped(10), 10);

        let big = CandidateSpace::new(19, 7);
        assert_eq!(big.total(), 17_689);
        assert_eq!(big.capped(2000), 2000);
    }

    #[test]
    fn test_decode_matches_nested_loops() {
        let space = CandidateSpace::new(3, 2);
        let mut k = 0;
        for driving in 0..3 {
            for driven in 0..3 {
                for bearing_1 in 0..2 {
                    for bearing_2 in 0..2 {
                        assert_eq!(
                            space.decode(k),
                            CandidateIndex {
                                driving,
                                driven,
                                bearing_1,
                                bearing_2
                            }
                        );
                        k += 1;
                    }
                }
            }
        }
        assert_eq!(k as u64, space.total());
    }

    #[test]
    fn test_truncation_keeps_leading_driving_diameters() {
        let space = CandidateSpace::new(19, 7);
        // 7 × 7 × 19 = 931 candidates per driving diameter
        let last = space.decode(space.capped(2000) - 1);
        assert_eq!(last.driving, 2);
    }
}
