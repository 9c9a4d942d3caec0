//! Random number generation with hardware entropy, plus the sampling
//! primitives the keypad and passcode code is built on.

mod hw;
mod mult;
pub mod urand;

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use mult::MULTIPLIERS;

pub use urand::{disable as disable_urandom, enable as enable_urandom, is_enabled as is_urandom_enabled};

pub fn entropy_source() -> &'static str {
    if urand::is_enabled() {
        "/dev/urandom"
    } else {
        hw::SOURCE
    }
}

// =============================================================================
// Entropy
// =============================================================================

#[inline(always)]
fn entropy() -> u64 {
    if urand::is_enabled()
        && let Some(word) = urand::rand()
    {
        return word;
    }
    hw::cycles()
}

// =============================================================================
// RNG
// =============================================================================

static STATE: AtomicU64 = AtomicU64::new(0);

/// Process-wide generator: every draw folds fresh entropy into the state.
pub struct Rand;

impl Rand {
    #[inline(always)]
    pub fn get() -> u64 {
        let state = STATE.load(Ordering::Relaxed);
        let ent = entropy();

        // Mix entropy into multiplier selection
        let mixed = state ^ ent;
        let idx = ((mixed ^ (mixed >> 32)) % MULTIPLIERS.len() as u64) as usize;

        // State transition: rotate, multiply, XOR entropy
        let new_state = state.rotate_left(17).wrapping_mul(MULTIPLIERS[idx]) ^ ent;
        STATE.store(new_state, Ordering::Relaxed);

        // SplitMix64 output finalizer
        let mut z = new_state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Uniform index in `0..n`. Returns 0 for `n == 0`.
    ///
    /// Draws that fall in the short final bucket of the u64 range are
    /// rejected, so every index is exactly equally likely.
    pub fn below(n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        let n = n as u64;
        let threshold = n.wrapping_neg() % n;
        loop {
            let r = Rand::get();
            if r >= threshold {
                return (r % n) as usize;
            }
        }
    }
}

pub fn zeroize_state() {
    STATE.store(0, Ordering::SeqCst);
}

// =============================================================================
// Sampling
// =============================================================================

/// Fisher-Yates: sweep from the last index down to 1, swapping each slot with
/// a uniformly chosen slot at or before it.
pub fn shuffle<T>(items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = Rand::below(i + 1);
        items.swap(i, j);
    }
}

/// Take up to `count` distinct items from `source` that are not in `excluded`,
/// in random order, and add them to `excluded`.
///
/// Calls sharing one `excluded` set never return the same item twice.
pub fn pick_unique<T: Clone + Eq + Hash>(
    source: &[T],
    count: usize,
    excluded: &mut HashSet<T>,
) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<T> = source
        .iter()
        .filter(|item| !excluded.contains(*item) && seen.insert(*item))
        .cloned()
        .collect();

    shuffle(&mut candidates);
    candidates.truncate(count);
    excluded.extend(candidates.iter().cloned());
    candidates
}
