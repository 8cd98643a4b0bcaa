//! Day-to-day price movement.
//!
//! The ledger asks a [`PriceMove`] source for one fractional change per day.
//! Production sessions use [`RandomWalk`]; tests inject [`ScriptedMoves`] or a
//! seeded walk so every price path is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal as RustDecimal;
use std::collections::VecDeque;

/// Fractional digits of a drawn move. 1e-9 of a price is far below one cent.
const MOVE_SCALE: u32 = 9;

/// Source of daily price changes, expressed as fractions (`-0.0125` = 1.25% down).
pub trait PriceMove {
    fn next_move(&mut self) -> RustDecimal;
}

/// Uniform random walk over `[-max_move, max_move)`.
///
/// Draws are taken on an integer grid of `10^-9` so the result is an exact
/// decimal: the low bound can be drawn, the high bound never is.
pub struct RandomWalk {
    rng: StdRng,
    bound: i64,
}

impl RandomWalk {
    /// Walk seeded from the operating system.
    pub fn new(max_move: RustDecimal) -> Self {
        Self::with_rng(max_move, StdRng::from_os_rng())
    }

    /// Walk with a fixed seed (for reproducible sessions and tests).
    pub fn with_seed(max_move: RustDecimal, seed: u64) -> Self {
        Self::with_rng(max_move, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_move: RustDecimal, rng: StdRng) -> Self {
        let bound = (max_move.abs() * RustDecimal::from(10_i64.pow(MOVE_SCALE)))
            .trunc()
            .to_i64()
            .unwrap_or(0);
        Self { rng, bound }
    }

    /// Largest magnitude this walk can draw, as a fraction.
    pub fn max_move(&self) -> RustDecimal {
        RustDecimal::new(self.bound, MOVE_SCALE)
    }
}

impl PriceMove for RandomWalk {
    fn next_move(&mut self) -> RustDecimal {
        if self.bound == 0 {
            return RustDecimal::ZERO;
        }
        let step = self.rng.random_range(-self.bound..self.bound);
        RustDecimal::new(step, MOVE_SCALE)
    }
}

/// Replays a fixed list of moves, then stays flat.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    moves: VecDeque<RustDecimal>,
}

impl ScriptedMoves {
    pub fn new(moves: impl IntoIterator<Item = RustDecimal>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }
}

impl PriceMove for ScriptedMoves {
    fn next_move(&mut self) -> RustDecimal {
        self.moves.pop_front().unwrap_or(RustDecimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> RustDecimal {
        RustDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_random_walk_stays_in_half_open_range() {
        let mut walk = RandomWalk::with_seed(d("0.05"), 7);
        for _ in 0..10_000 {
            let pct = walk.next_move();
            assert!(pct >= d("-0.05"), "below range: {}", pct);
            assert!(pct < d("0.05"), "at or above range: {}", pct);
        }
    }

    #[test]
    fn test_same_seed_same_path() {
        let mut a = RandomWalk::with_seed(d("0.05"), 42);
        let mut b = RandomWalk::with_seed(d("0.05"), 42);
        let path_a: Vec<_> = (0..20).map(|_| a.next_move()).collect();
        let path_b: Vec<_> = (0..20).map(|_| b.next_move()).collect();
        assert_eq!(path_a, path_b);
    }

    #[test]
    fn test_max_move_is_exact() {
        let walk = RandomWalk::with_seed(d("0.05"), 1);
        assert_eq!(walk.max_move(), d("0.05"));
    }

    #[test]
    fn test_zero_bound_is_flat() {
        let mut walk = RandomWalk::with_seed(RustDecimal::ZERO, 1);
        assert_eq!(walk.next_move(), RustDecimal::ZERO);
    }

    #[test]
    fn test_scripted_moves_then_flat() {
        let mut moves = ScriptedMoves::new([d("0.01"), d("-0.02")]);
        assert_eq!(moves.next_move(), d("0.01"));
        assert_eq!(moves.next_move(), d("-0.02"));
        assert_eq!(moves.next_move(), RustDecimal::ZERO);
    }
}
