//! Passcode domain: symbols, keypads, generation and key rendering.

pub mod generate;
pub mod keypad;
pub mod render;
pub mod vocab;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

pub use generate::{digit_passcode, emoji_passcode};
pub use keypad::{Keypad, compose};
pub use render::resolve_render_keys;
pub use vocab::{Category, Vocabulary};

/// Symbols per passcode.
pub const PIN_LENGTH: usize = 4;

/// Most times one emoji may appear in a passcode.
pub const MAX_EMOJI_REPEAT: usize = 2;

/// Keys on every keypad.
pub const KEYPAD_SIZE: usize = 10;

// =============================================================================
// Symbol
// =============================================================================

/// One key on a keypad: a digit or an emoji glyph. Compared as an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(glyph: impl Into<String>) -> Self {
        Symbol(glyph.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol(s.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Zeroize for Symbol {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Distinct symbols in first-seen order.
pub fn unique_symbols(symbols: &[Symbol]) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    symbols
        .iter()
        .filter(|s| seen.insert(*s))
        .cloned()
        .collect()
}

/// Concatenate symbols into the raw string used for comparison.
pub fn join_symbols(symbols: &[Symbol]) -> String {
    symbols.iter().map(Symbol::as_str).collect()
}

// =============================================================================
// PasswordType
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordType {
    Digits,
    #[default]
    Emoji,
}

impl PasswordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordType::Digits => "digits",
            PasswordType::Emoji => "emoji",
        }
    }
}

impl fmt::Display for PasswordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordType {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "digits" | "digit" => Ok(PasswordType::Digits),
            "emoji" | "emojis" => Ok(PasswordType::Emoji),
            other => Err(PinError::UnknownPasswordType(other.to_string())),
        }
    }
}

// =============================================================================
// Passcode
// =============================================================================

/// An ordered run of `PIN_LENGTH` symbols. Wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passcode {
    symbols: Vec<Symbol>,
}

impl Passcode {
    pub(crate) fn from_symbols(symbols: Vec<Symbol>) -> Self {
        Passcode { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The passcode as one string, exactly as it is stored and compared.
    pub fn joined(&self) -> String {
        join_symbols(&self.symbols)
    }

    pub fn unique_symbols(&self) -> Vec<Symbol> {
        unique_symbols(&self.symbols)
    }

    /// Highest number of times any single symbol occurs.
    pub fn max_repeat(&self) -> usize {
        self.symbols
            .iter()
            .map(|s| self.symbols.iter().filter(|t| *t == s).count())
            .max()
            .unwrap_or(0)
    }
}

impl Drop for Passcode {
    fn drop(&mut self) {
        self.symbols.iter_mut().for_each(Zeroize::zeroize);
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinError {
    /// The pool cannot yield a passcode under the repeat cap.
    InsufficientPool { distinct: usize, attempts: usize },
    InvalidKeypad(String),
    InvalidRatio { sum: usize },
    VocabularyTooSmall { distinct: usize },
    UnknownPasswordType(String),
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::InsufficientPool { distinct, attempts } => write!(
                f,
                "Symbol pool too small: {} distinct symbol(s), gave up after {} draw(s)",
                distinct, attempts
            ),
            PinError::InvalidKeypad(s) => write!(f, "Invalid keypad: {}", s),
            PinError::InvalidRatio { sum } => write!(
                f,
                "Category ratio must sum to {}, got {}",
                KEYPAD_SIZE, sum
            ),
            PinError::VocabularyTooSmall { distinct } => write!(
                f,
                "Vocabulary needs at least {} distinct symbols, got {}",
                KEYPAD_SIZE, distinct
            ),
            PinError::UnknownPasswordType(s) => {
                write!(f, "Unknown password type: {} (expected emoji or digits)", s)
            }
        }
    }
}

impl std::error::Error for PinError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn syms(list: &[&str]) -> Vec<Symbol> {
        list.iter().map(|s| Symbol::from(*s)).collect()
    }

    #[test]
    fn test_password_type_parse() {
        assert_eq!("emoji".parse::<PasswordType>().unwrap(), PasswordType::Emoji);
        assert_eq!(" Digits ".parse::<PasswordType>().unwrap(), PasswordType::Digits);
        assert!(matches!(
            "letters".parse::<PasswordType>(),
            Err(PinError::UnknownPasswordType(_))
        ));
    }

    #[test]
    fn test_password_type_serde_lowercase() {
        let json = serde_json::to_string(&PasswordType::Digits).unwrap();
        assert_eq!(json, "\"digits\"");
        let parsed: PasswordType = serde_json::from_str("\"emoji\"").unwrap();
        assert_eq!(parsed, PasswordType::Emoji);
    }

    #[test]
    fn test_unique_symbols_keeps_first_seen_order() {
        let input = syms(&["🔥", "🌙", "🔥", "⭐"]);
        assert_eq!(unique_symbols(&input), syms(&["🔥", "🌙", "⭐"]));
    }

    #[test]
    fn test_passcode_joined_and_repeat() {
        let code = Passcode::from_symbols(syms(&["🔥", "🌙", "🔥", "⭐"]));
        assert_eq!(code.joined(), "🔥🌙🔥⭐");
        assert_eq!(code.max_repeat(), 2);
        assert_eq!(code.len(), 4);
    }
}
