//! RNG module - 7-bag random piece generation
//!
//! Each bag holds one of each piece kind in a Fisher-Yates shuffled order. Pieces are
//! taken from the bag until it is empty, then a fresh shuffle refills it in place.
//!
//! Also provides a simple LCG so a seed fully determines the piece sequence.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct RandomBag {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index of the next piece to take; 7 means exhausted
    bag_index: usize,
    rng: SimpleRng,
}

impl RandomBag {
    /// Create an empty bag; the first [`take`](Self::take) shuffles.
    pub fn new(seed: u32) -> Self {
        Self {
            bag: PieceKind::ALL,
            bag_index: PieceKind::ALL.len(),
            rng: SimpleRng::new(seed),
        }
    }

    /// Generate a new shuffled bag
    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Take the next piece, refilling first when the bag is exhausted.
    pub fn take(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Pieces left before the next refill.
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }

    /// Current RNG state (seeds a restart with the continuing sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for RandomBag {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..20 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_new_bag_is_empty_until_first_take() {
        let mut bag = RandomBag::new(1);
        assert!(bag.remaining().is_empty());

        bag.take();
        assert_eq!(bag.remaining().len(), 6);
    }

    #[test]
    fn test_bag_takes_all_seven() {
        let mut bag = RandomBag::new(1);

        let mut drawn: Vec<PieceKind> = (0..7).map(|_| bag.take()).collect();
        drawn.sort();
        assert_eq!(drawn, PieceKind::ALL.to_vec());
    }

    #[test]
    fn test_bag_refills_in_place() {
        let mut bag = RandomBag::new(99);
        for _ in 0..7 {
            bag.take();
        }
        assert!(bag.remaining().is_empty());

        bag.take();
        assert_eq!(bag.remaining().len(), 6);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut bag_a = RandomBag::new(42);
        let mut bag_b = RandomBag::new(42);
        let a: Vec<_> = (0..21).map(|_| bag_a.take()).collect();
        let b: Vec<_> = (0..21).map(|_| bag_b.take()).collect();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn every_window_of_seven_after_refill_is_a_permutation(seed in any::<u32>(), bags in 1usize..12) {
            let mut bag = RandomBag::new(seed);
            let mut counts = [0usize; 7];

            for k in 1..=bags {
                let mut window: Vec<PieceKind> = (0..7).map(|_| bag.take()).collect();
                for p in &window {
                    counts[p.index()] += 1;
                }
                window.sort();
                prop_assert_eq!(window, PieceKind::ALL.to_vec());
                prop_assert!(counts.iter().all(|&c| c == k));
            }
        }
    }
}
