//! Which keys to put on screen for a given passcode.

use std::collections::HashSet;

use super::vocab::Vocabulary;
use super::{KEYPAD_SIZE, Keypad, PasswordType, Symbol, unique_symbols};
use crate::rand::{pick_unique, shuffle};
use crate::session::{ExperimentMode, Session};

/// Decide the ordered keys to render.
///
/// - Digits: always the canonical digit keypad.
/// - Emoji with a non-empty `fixed` snapshot: exactly that snapshot.
/// - Emoji, no snapshot, experiment on: the session's fixed keypad, which was
///   the pool the passcode was drawn from.
/// - Emoji, no snapshot, experiment off: every distinct symbol of `required`
///   plus fresh random padding from the vocabulary, shuffled.
pub fn resolve_render_keys(
    session: &mut Session,
    mode: ExperimentMode,
    password_type: PasswordType,
    required: &[Symbol],
    fixed: Option<&[Symbol]>,
) -> Vec<Symbol> {
    match password_type {
        PasswordType::Digits => Keypad::digits().into_symbols(),
        PasswordType::Emoji => match fixed {
            Some(keys) if !keys.is_empty() => keys.to_vec(),
            _ => match mode {
                ExperimentMode::On => session.fixed_keypad().into_symbols(),
                ExperimentMode::Off => padded_keys(session.vocabulary(), required),
            },
        },
    }
}

fn padded_keys(vocab: &Vocabulary, required: &[Symbol]) -> Vec<Symbol> {
    let mut keys = unique_symbols(required);
    let mut excluded: HashSet<Symbol> = keys.iter().cloned().collect();
    let slots = KEYPAD_SIZE.saturating_sub(keys.len());
    keys.extend(pick_unique(vocab.symbols(), slots, &mut excluded));
    shuffle(&mut keys);
    keys
}
