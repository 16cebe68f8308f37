//! Per-round base number pool.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::mode::Mode;

/// Uniformly shuffled permutation of `1..=mode.max_n()`.
///
/// `SliceRandom::shuffle` is a Fisher–Yates shuffle, so every ordering is
/// equally likely given a uniform source.
pub fn build_pool<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> VecDeque<u32> {
    let mut numbers: Vec<u32> = (1..=mode.max_n()).collect();
    numbers.shuffle(rng);
    numbers.into()
}
