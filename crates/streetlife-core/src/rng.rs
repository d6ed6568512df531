//! Seeded Randomness
//!
//! Every rules engine owns a [`GameRng`] so outcomes replay exactly from a seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Deterministic random source handed to each subsystem.
#[derive(Debug, Clone)]
pub struct GameRng(SmallRng);

impl GameRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Derives an independent generator, advancing this one.
    pub fn fork(&mut self) -> Self {
        Self(SmallRng::seed_from_u64(self.0.gen()))
    }

    /// True with probability `p` (values outside [0, 1] saturate).
    pub fn chance(&mut self, p: f32) -> bool {
        self.0.gen::<f32>() < p
    }

    /// Uniform float in [lo, hi]. Returns `lo` if the range is empty.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    /// Uniform integer in [lo, hi].
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    pub fn choose<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        if options.is_empty() {
            return None;
        }
        options.get(self.0.gen_range(0..options.len()))
    }

    /// Weighted random selection. Non-positive totals fall back to the first entry.
    pub fn weighted_choice<'a, T>(&mut self, candidates: &'a [(T, f32)]) -> Option<&'a T> {
        let (first, _) = candidates.first()?;
        let total: f32 = candidates.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return Some(first);
        }

        let mut roll: f32 = self.0.gen::<f32>() * total;
        for (candidate, weight) in candidates {
            let weight = weight.max(0.0);
            if weight == 0.0 {
                continue;
            }
            roll -= weight;
            if roll <= 0.0 {
                return Some(candidate);
            }
        }

        // float drift: fall back to the last candidate that could be picked
        candidates
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(c, _)| c)
    }

    /// Shuffles a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        use rand::seq::SliceRandom;
        items.shuffle(&mut self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = GameRng::seed_from_u64(42);
        let mut b = GameRng::seed_from_u64(42);
        let xs: Vec<f64> = (0..20).map(|_| a.uniform(0.0, 1.0)).collect();
        let ys: Vec<f64> = (0..20).map(|_| b.uniform(0.0, 1.0)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut a = GameRng::seed_from_u64(7);
        let mut b = GameRng::seed_from_u64(7);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.range_inclusive(0, 1000), fb.range_inclusive(0, 1000));
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_weighted_choice_skips_zero_weights() {
        let mut rng = GameRng::seed_from_u64(12345);
        let candidates = [("never", 0.0), ("always", 1.0)];
        for _ in 0..200 {
            assert_eq!(rng.weighted_choice(&candidates), Some(&"always"));
        }
    }

    #[test]
    fn test_weighted_choice_bias() {
        let mut rng = GameRng::seed_from_u64(99);
        let candidates = [("low", 0.1), ("high", 0.9)];
        let high = (0..1000)
            .filter(|_| rng.weighted_choice(&candidates) == Some(&"high"))
            .count();
        assert!(high > 800);
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let mut rng = GameRng::seed_from_u64(3);
        for _ in 0..200 {
            let v = rng.range_inclusive(2, 4);
            assert!((2..=4).contains(&v));
        }
        assert_eq!(rng.range_inclusive(5, 5), 5);
        assert!(rng.choose::<u8>(&[]).is_none());
    }
}
