//! Multiple-choice answer generation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ChoiceError;
use crate::mode::Mode;

/// Choices shown per question, correct answer included.
pub const CHOICE_COUNT: usize = 4;

/// Check that `mode` can offer `count` distinct choices for any number in
/// its domain. Powers are injective, so every number has `max_n - 1`
/// possible distractors.
pub fn check_capacity(mode: Mode, count: usize) -> Result<(), ChoiceError> {
    if count == 0 {
        return Err(ChoiceError::NoChoices);
    }
    let available = mode.max_n() as usize - 1;
    let needed = count - 1;
    if needed > available {
        return Err(ChoiceError::PoolExhausted { needed, available });
    }
    Ok(())
}

/// Build `count` distinct choices for `n`: the correct power plus
/// distractors drawn from the powers of every other number in the domain,
/// in random display order.
pub fn build_choices<R: Rng + ?Sized>(
    mode: Mode,
    n: u32,
    count: usize,
    rng: &mut R,
) -> Result<Vec<u64>, ChoiceError> {
    if !mode.contains(n) {
        return Err(ChoiceError::OutOfDomain {
            number: n,
            max: mode.max_n(),
        });
    }
    if count == 0 {
        return Err(ChoiceError::NoChoices);
    }

    let correct = mode.power(n);
    let mut pool: Vec<u64> = (1..=mode.max_n())
        .filter(|&i| i != n)
        .map(|i| mode.power(i))
        .filter(|&v| v != correct)
        .collect();
    pool.sort_unstable();
    pool.dedup();

    let needed = count - 1;
    if pool.len() < needed {
        return Err(ChoiceError::PoolExhausted {
            needed,
            available: pool.len(),
        });
    }

    let mut choices: Vec<u64> = pool.choose_multiple(rng, needed).copied().collect();
    choices.push(correct);
    choices.shuffle(rng);
    Ok(choices)
}
