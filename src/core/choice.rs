//! Tie-break strategies for one-to-many metaprobeset mappings
//!
//! A gene metaprobeset that maps to several exon metaprobesets is resolved
//! to exactly one of them. The chooser is injected so runs can be pinned.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks one candidate out of a non-empty list
pub trait CandidateChooser {
    /// Return an index into `candidates`; only called with two or more
    fn choose(&mut self, candidates: &[String]) -> usize;
}

/// Uniform random choice backed by any `Rng`
#[derive(Debug, Clone)]
pub struct RandomChooser<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomChooser<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomChooser<ChaCha8Rng> {
    /// Reproducible chooser
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Chooser seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Seeded when a seed is given, otherwise from entropy
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> CandidateChooser for RandomChooser<R> {
    fn choose(&mut self, candidates: &[String]) -> usize {
        self.rng.gen_range(0..candidates.len())
    }
}

/// Always takes the candidate at a fixed position (clamped to the list)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedChooser(pub usize);

impl CandidateChooser for FixedChooser {
    fn choose(&mut self, candidates: &[String]) -> usize {
        self.0.min(candidates.len().saturating_sub(1))
    }
}

impl<F> CandidateChooser for F
where
    F: FnMut(&[String]) -> usize,
{
    fn choose(&mut self, candidates: &[String]) -> usize {
        self(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["EM1".to_string(), "EM2".to_string(), "EM3".to_string()]
    }

    #[test]
    fn test_seeded_chooser_is_reproducible() {
        let list = candidates();
        let mut a = RandomChooser::seeded(42);
        let mut b = RandomChooser::seeded(42);
        let picks_a: Vec<usize> = (0..20).map(|_| a.choose(&list)).collect();
        let picks_b: Vec<usize> = (0..20).map(|_| b.choose(&list)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&i| i < list.len()));
    }

    #[test]
    fn test_random_chooser_covers_candidates() {
        let list = candidates();
        let mut chooser = RandomChooser::seeded(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[chooser.choose(&list)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_fixed_chooser_clamps() {
        let list = candidates();
        assert_eq!(FixedChooser(1).choose(&list), 1);
        assert_eq!(FixedChooser(10).choose(&list), 2);
    }

    #[test]
    fn test_closure_chooser() {
        let list = candidates();
        let mut last = |c: &[String]| c.len() - 1;
        assert_eq!(CandidateChooser::choose(&mut last, &list), 2);
    }
}
