//! Key-entry buffer shared by confirmation and login.

use zeroize::Zeroize;

use crate::pin::{PIN_LENGTH, Symbol, join_symbols};

pub const CENSOR_CHAR: char = '●';
pub const EMPTY_CHAR: char = '-';

/// Keypad slot for a typed key: `1`-`9` are slots 0-8, `0` is slot 9.
pub fn slot_index(key: char) -> Option<usize> {
    match key {
        '1'..='9' => Some(key as usize - '1' as usize),
        '0' => Some(9),
        _ => None,
    }
}

/// The key that selects slot `index`, inverse of [`slot_index`].
pub fn slot_label(index: usize) -> char {
    match index {
        0..=8 => (b'1' + index as u8) as char,
        _ => '0',
    }
}

/// Up to `PIN_LENGTH` pressed keys. Extra presses are ignored.
/// Contents are wiped on clear and on drop.
#[derive(Debug, Default)]
pub struct InputBuffer {
    entries: Vec<Symbol>,
}

impl InputBuffer {
    pub fn new() -> Self {
        InputBuffer {
            entries: Vec::with_capacity(PIN_LENGTH),
        }
    }

    /// Returns false if the buffer is already full.
    pub fn push(&mut self, symbol: Symbol) -> bool {
        if self.is_complete() {
            return false;
        }
        self.entries.push(symbol);
        true
    }

    /// Press the key at the slot addressed by `key` on `keys`.
    pub fn press_slot(&mut self, keys: &[Symbol], key: char) -> bool {
        match slot_index(key).and_then(|i| keys.get(i)) {
            Some(symbol) => self.push(symbol.clone()),
            None => false,
        }
    }

    pub fn backspace(&mut self) -> bool {
        match self.entries.pop() {
            Some(mut last) => {
                last.zeroize();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(Zeroize::zeroize);
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() >= PIN_LENGTH
    }

    pub fn entries(&self) -> &[Symbol] {
        &self.entries
    }

    pub fn joined(&self) -> String {
        join_symbols(&self.entries)
    }

    /// Masked view: one `●` per entry, `-` for each open slot.
    pub fn display(&self) -> String {
        let filled = self.entries.len().min(PIN_LENGTH);
        let mut out = String::with_capacity(PIN_LENGTH * 3);
        out.extend(std::iter::repeat_n(CENSOR_CHAR, filled));
        out.extend(std::iter::repeat_n(EMPTY_CHAR, PIN_LENGTH - filled));
        out
    }

    pub fn meta(&self) -> String {
        format!("Length {} / {}", self.entries.len(), PIN_LENGTH)
    }
}

impl Drop for InputBuffer {
    fn drop(&mut self) {
        self.clear();
    }
}
