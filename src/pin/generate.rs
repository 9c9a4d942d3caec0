//! Passcode generation.

use std::collections::HashMap;

use super::keypad::DIGIT_KEYS;
use super::{MAX_EMOJI_REPEAT, PIN_LENGTH, Passcode, PinError, Symbol, unique_symbols};
use crate::rand::Rand;

/// Draw budget for the rejection loop. Any pool that passes the up-front
/// check finishes in far fewer draws.
const MAX_DRAWS: usize = 10_000;

/// `PIN_LENGTH` digits drawn independently; repeats allowed.
pub fn digit_passcode() -> Passcode {
    let symbols = (0..PIN_LENGTH)
        .map(|_| Symbol::from(DIGIT_KEYS[Rand::below(DIGIT_KEYS.len())]))
        .collect();
    Passcode::from_symbols(symbols)
}

/// `PIN_LENGTH` symbols drawn from `pool`, none more than `MAX_EMOJI_REPEAT` times.
///
/// Draws that would exceed the cap are rejected and redrawn.
pub fn emoji_passcode(pool: &[Symbol]) -> Result<Passcode, PinError> {
    let distinct = unique_symbols(pool).len();
    if distinct * MAX_EMOJI_REPEAT < PIN_LENGTH {
        return Err(PinError::InsufficientPool {
            distinct,
            attempts: 0,
        });
    }

    let mut counts: HashMap<&Symbol, usize> = HashMap::new();
    let mut symbols = Vec::with_capacity(PIN_LENGTH);
    let mut draws = 0;

    while symbols.len() < PIN_LENGTH {
        if draws == MAX_DRAWS {
            return Err(PinError::InsufficientPool {
                distinct,
                attempts: draws,
            });
        }
        draws += 1;

        let pick = &pool[Rand::below(pool.len())];
        let used = counts.entry(pick).or_insert(0);
        if *used >= MAX_EMOJI_REPEAT {
            continue;
        }
        *used += 1;
        symbols.push(pick.clone());
    }

    Ok(Passcode::from_symbols(symbols))
}
