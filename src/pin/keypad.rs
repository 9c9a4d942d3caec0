//! Keypads and the emoji keypad composer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::vocab::Vocabulary;
use super::{KEYPAD_SIZE, PinError, Symbol};
use crate::rand::{pick_unique, shuffle};

/// Digit keys in display order.
pub const DIGIT_KEYS: [&str; KEYPAD_SIZE] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

/// Exactly `KEYPAD_SIZE` distinct symbols in display order.
///
/// Deserializing goes through the same check, so a damaged snapshot on disk
/// is rejected instead of producing a short or duplicated keypad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct Keypad(Vec<Symbol>);

impl Keypad {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, PinError> {
        if symbols.len() != KEYPAD_SIZE {
            return Err(PinError::InvalidKeypad(format!(
                "expected {} keys, got {}",
                KEYPAD_SIZE,
                symbols.len()
            )));
        }
        let distinct: HashSet<&Symbol> = symbols.iter().collect();
        if distinct.len() != symbols.len() {
            return Err(PinError::InvalidKeypad("duplicate keys".to_string()));
        }
        Ok(Keypad(symbols))
    }

    /// The canonical digit keypad.
    pub fn digits() -> Self {
        Keypad(DIGIT_KEYS.iter().map(|d| Symbol::from(*d)).collect())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains(symbol)
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.0
    }
}

impl TryFrom<Vec<Symbol>> for Keypad {
    type Error = PinError;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self, Self::Error> {
        Keypad::new(symbols)
    }
}

impl From<Keypad> for Vec<Symbol> {
    fn from(keypad: Keypad) -> Self {
        keypad.0
    }
}

/// Build a fresh emoji keypad from the vocabulary.
///
/// Without ratio weighting this is a uniform sample of the whole table. With
/// it, each category in ratio order contributes its count of keys; a category
/// smaller than its count leaves a shortfall that is topped up from the whole
/// table, so the ratio is a target rather than a guarantee.
pub fn compose(vocab: &Vocabulary) -> Keypad {
    if !vocab.uses_ratio() {
        let mut keys = vocab.symbols().to_vec();
        shuffle(&mut keys);
        keys.truncate(KEYPAD_SIZE);
        return Keypad(keys);
    }

    let mut picked = HashSet::new();
    let mut keys = Vec::with_capacity(KEYPAD_SIZE);

    for entry in vocab.ratio() {
        let list = vocab
            .category(&entry.category)
            .map(|c| c.symbols.as_slice())
            .unwrap_or(&[]);
        keys.extend(pick_unique(list, entry.count, &mut picked));
    }

    if keys.len() < KEYPAD_SIZE {
        keys.extend(pick_unique(
            vocab.symbols(),
            KEYPAD_SIZE - keys.len(),
            &mut picked,
        ));
    }

    shuffle(&mut keys);
    keys.truncate(KEYPAD_SIZE);
    Keypad(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::vocab::{Category, RatioEntry};

    fn ratio(entries: &[(&str, usize)]) -> Vec<RatioEntry> {
        entries
            .iter()
            .map(|(c, n)| RatioEntry {
                category: c.to_string(),
                count: *n,
            })
            .collect()
    }

    fn assert_valid(keypad: &Keypad, vocab: &Vocabulary) {
        assert_eq!(keypad.symbols().len(), KEYPAD_SIZE);
        let distinct: HashSet<_> = keypad.symbols().iter().collect();
        assert_eq!(distinct.len(), KEYPAD_SIZE);
        assert!(keypad.symbols().iter().all(|s| vocab.contains(s)));
    }

    #[test]
    fn test_digit_keypad_order() {
        let keys: Vec<String> = Keypad::digits()
            .symbols()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(keys.join(""), "1234567890");
    }

    #[test]
    fn test_keypad_new_rejects_bad_shapes() {
        let short: Vec<Symbol> = ["a", "b"].iter().map(|s| Symbol::from(*s)).collect();
        assert!(matches!(Keypad::new(short), Err(PinError::InvalidKeypad(_))));

        let mut dup = Keypad::digits().into_symbols();
        dup[9] = Symbol::from("1");
        assert!(matches!(Keypad::new(dup), Err(PinError::InvalidKeypad(_))));
    }

    #[test]
    fn test_keypad_deserialize_validates() {
        let ok: Keypad = serde_json::from_str(r#"["1","2","3","4","5","6","7","8","9","0"]"#).unwrap();
        assert_eq!(ok, Keypad::digits());
        let bad = serde_json::from_str::<Keypad>(r#"["1","1","3"]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_compose_with_standard_ratio() {
        let vocab = Vocabulary::standard();
        for _ in 0..200 {
            let keypad = compose(&vocab);
            assert_valid(&keypad, &vocab);

            let count = |name: &str| {
                keypad
                    .symbols()
                    .iter()
                    .filter(|s| vocab.category_of(s) == Some(name))
                    .count()
            };
            assert_eq!(count("smileys"), 3);
            assert_eq!(count("objects"), 3);
            assert_eq!(count("places"), 2);
            assert_eq!(count("nature"), 2);
        }
    }

    #[test]
    fn test_compose_without_ratio() {
        let standard = Vocabulary::standard();
        let vocab = Vocabulary::new(standard.categories().to_vec(), Vec::new(), false).unwrap();
        for _ in 0..200 {
            assert_valid(&compose(&vocab), &vocab);
        }
    }

    #[test]
    fn test_compose_tops_up_small_category() {
        // "few" has two symbols but asks for six; the shortfall comes from
        // the whole table, so it may include more "many" keys than its ratio.
        let categories = vec![
            Category::new("few", &["🔥", "🌙"]),
            Category::new("many", &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]),
        ];
        let vocab = Vocabulary::new(categories, ratio(&[("few", 6), ("many", 4)]), true).unwrap();
        for _ in 0..200 {
            let keypad = compose(&vocab);
            assert_valid(&keypad, &vocab);
            assert!(keypad.contains(&Symbol::from("🔥")));
            assert!(keypad.contains(&Symbol::from("🌙")));
        }
    }

    #[test]
    fn test_compose_unknown_category_is_topped_up() {
        let standard = Vocabulary::standard();
        let vocab = Vocabulary::new(
            standard.categories().to_vec(),
            ratio(&[("smileys", 5), ("missing", 5)]),
            true,
        )
        .unwrap();
        for _ in 0..100 {
            assert_valid(&compose(&vocab), &vocab);
        }
    }

    #[test]
    fn test_compose_varies() {
        let vocab = Vocabulary::standard();
        let first = compose(&vocab);
        assert!((0..20).any(|_| compose(&vocab) != first));
    }
}
