//! Randomness sources.
//!
//! Every probabilistic rule (damage variance, critical hits, monster
//! selection, breakthrough/insight rolls, drops) draws from a
//! [`RandomSource`]. Production code uses [`GameRng`] (seedable ChaCha8);
//! tests pin individual rolls with [`ScriptedRolls`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.
    fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64;

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index into a slice of length `len` (`len` must be > 0).
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.range_inclusive(0, len as i64 - 1) as usize
    }
}

// ── Seeded RNG ────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        Self::seeded(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

// ── Scripted rolls ────────────────────────────────────────────

/// Replays queued values, then falls back to fixed defaults.
///
/// Integer rolls are clamped into the requested range, so a default of `0`
/// pins damage variance to zero and a default float of `0.99` makes every
/// `chance(p)` with `p < 0.99` fail.
#[derive(Clone, Debug)]
pub struct ScriptedRolls {
    floats: VecDeque<f64>,
    ints: VecDeque<i64>,
    default_float: f64,
    default_int: i64,
}

impl ScriptedRolls {
    /// Every float roll is `0.99`, every integer roll is `0` (clamped).
    pub fn new() -> Self {
        Self {
            floats: VecDeque::new(),
            ints: VecDeque::new(),
            default_float: 0.99,
            default_int: 0,
        }
    }

    pub fn with_default_float(mut self, value: f64) -> Self {
        self.default_float = value;
        self
    }

    pub fn with_default_int(mut self, value: i64) -> Self {
        self.default_int = value;
        self
    }

    pub fn push_float(&mut self, value: f64) -> &mut Self {
        self.floats.push_back(value);
        self
    }

    pub fn push_int(&mut self, value: i64) -> &mut Self {
        self.ints.push_back(value);
        self
    }
}

impl Default for ScriptedRolls {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ScriptedRolls {
    fn next_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(self.default_float)
    }

    fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        let v = self.ints.pop_front().unwrap_or(self.default_int);
        v.clamp(lo, hi.max(lo))
    }
}
