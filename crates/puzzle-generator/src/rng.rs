//! Seeded random source used by puzzle proposers.
//!
//! Every sampling helper is derived from [`RandomSource::next_f64`], so the
//! output of a source is a pure function of its seed and the sequence of
//! calls made on it. Nothing here reads the clock or OS entropy.

use std::fmt;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::RandomError;

/// Consonant pool for pseudo-words. Digraphs keep the words pronounceable.
const CONSONANTS: &[&str] = &[
    "th", "ch", "sh", "qu", "b", "c", "d", "f", "g", "h", "j", "k", "l", "m", "n", "p", "r",
    "s", "t", "v", "w", "x", "z",
];

const VOWELS: &[&str] = &["a", "e", "i", "y", "o", "u"];

/// Deterministic initializer for a [`RandomSource`].
///
/// Deserializes from either a JSON string or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Text(String),
    Number(u64),
}

impl Seed {
    /// Reduce the seed to the 64-bit word fed to the PRNG.
    ///
    /// Text seeds use the first 8 bytes of their SHA-256 digest.
    pub fn to_u64(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(text) => {
                let digest = Sha256::digest(text.as_bytes());
                let mut word = [0u8; 8];
                word.copy_from_slice(&digest[..8]);
                u64::from_le_bytes(word)
            }
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Text(text) => write!(f, "{text}"),
            Seed::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Seed {
    fn from(text: &str) -> Self {
        Seed::Text(text.to_string())
    }
}

impl From<String> for Seed {
    fn from(text: String) -> Self {
        Seed::Text(text)
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

/// Seeded pseudo-random generator with derived sampling helpers.
pub struct RandomSource {
    seed: Seed,
    inner: Pcg64Mcg,
}

impl RandomSource {
    pub fn new(seed: impl Into<Seed>) -> Self {
        let seed = seed.into();
        let inner = Pcg64Mcg::seed_from_u64(seed.to_u64());
        Self { seed, inner }
    }

    /// The seed this source was built from.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Uniform float in `[0, 1)` built from the top 53 bits of one PCG word.
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Integer in `[lo, hi)`. Returns `lo` when the range is empty.
    pub fn int_range(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = hi.wrapping_sub(lo) as u64;
        let offset = (self.next_f64() * span as f64) as u64;
        // Rounding in the float product can land exactly on `span`.
        lo.wrapping_add(offset.min(span - 1) as i64)
    }

    /// Integer in `[lo, hi]`.
    pub fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        self.int_range(lo, hi.saturating_add(1))
    }

    /// Float in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RandomError> {
        if items.is_empty() {
            return Err(RandomError::EmptyInput { operation: "choice" });
        }
        Ok(self.pick(items))
    }

    /// Pick an item with probability proportional to its weight.
    pub fn weighted_choice<'a, T>(
        &mut self,
        items: &'a [T],
        weights: &[f64],
    ) -> Result<&'a T, RandomError> {
        if items.is_empty() {
            return Err(RandomError::EmptyInput {
                operation: "weighted_choice",
            });
        }
        if items.len() != weights.len() {
            return Err(RandomError::WeightMismatch {
                items: items.len(),
                weights: weights.len(),
            });
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RandomError::InvalidWeights);
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(RandomError::InvalidWeights);
        }

        let target = self.next_f64() * total;
        let mut cumulative = 0.0;
        let mut last_positive = 0;
        for (index, weight) in weights.iter().enumerate() {
            if *weight > 0.0 {
                last_positive = index;
            }
            cumulative += weight;
            if target < cumulative {
                return Ok(&items[index]);
            }
        }
        Ok(&items[last_positive])
    }

    /// In-place Fisher-Yates shuffle. Returns the slice for chaining.
    pub fn shuffle<'a, T>(&mut self, items: &'a mut [T]) -> &'a mut [T] {
        for i in (1..items.len()).rev() {
            let j = self.int_range(0, i as i64 + 1) as usize;
            items.swap(i, j);
        }
        items
    }

    /// `k` items drawn without replacement (all of them if `k` is larger).
    pub fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        let mut copy = items.to_vec();
        self.shuffle(&mut copy);
        copy.truncate(k);
        copy
    }

    /// Pronounceable lowercase token with length in `[min_len, max_len]`.
    pub fn pseudo_word(&mut self, min_len: usize, max_len: usize) -> String {
        let mut word = String::new();
        for _ in 0..=max_len / 2 {
            word.push_str(*self.pick(CONSONANTS));
            word.push_str(*self.pick(VOWELS));
        }
        let len = self.int_range(min_len as i64, max_len as i64 + 1) as usize;
        word.truncate(len);
        word
    }

    /// String of `alphabet` characters with length in `[min_len, max_len]`.
    pub fn random_string(
        &mut self,
        min_len: usize,
        max_len: usize,
        alphabet: &[char],
    ) -> Result<String, RandomError> {
        let len = self.int_range(min_len as i64, max_len as i64 + 1) as usize;
        (0..len).map(|_| self.choice(alphabet).copied()).collect()
    }

    /// Printable ASCII character, space through `~`.
    pub fn printable_char(&mut self) -> char {
        self.int_range(32, 127) as u8 as char
    }

    /// Heavy-tailed float centered between `lower` and `upper`.
    ///
    /// Most draws land within a few `median_dev` of the center; the rest
    /// spread out toward the bounds. Returns `lower` for an empty range or
    /// any non-finite argument.
    pub fn heavy_tail_float(&mut self, lower: f64, upper: f64, median_dev: f64) -> f64 {
        let finite = lower.is_finite() && upper.is_finite() && median_dev.is_finite();
        if !finite || upper <= lower {
            return lower;
        }
        let mean = (lower + upper) / 2.0;
        let trunc = (upper - lower) / 2.0;
        loop {
            let r = (self.next_f64().powi(-2) - 1.0) / 3.0;
            let r = if self.chance(0.5) { -r } else { r };
            let x = mean - median_dev * r;
            if (x - mean).abs() <= trunc {
                return x;
            }
        }
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = (self.next_f64() * items.len() as f64) as usize;
        &items[index.min(items.len() - 1)]
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").field("seed", &self.seed).finish()
    }
}
