//! Emoji vocabulary: named categories and the keypad ratio across them.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::keypad::DIGIT_KEYS;
use super::{KEYPAD_SIZE, PinError, Symbol};

const SMILEYS: &[&str] = &[
    "😁", "🤣", "😅", "😊", "😎", "😍", "😘", "🤔", "😴", "😡", "🤯", "🥳",
];
const OBJECTS: &[&str] = &["📚", "🔒", "💡", "📱", "🎒", "🧭"];
const PLACES: &[&str] = &["🏠", "🏥", "🗽", "🗼", "🗻", "🌋"];
const NATURE: &[&str] = &["🌞", "🌧", "🌈", "🔥", "🌙", "⭐", "🌸"];

const STANDARD_RATIO: &[(&str, usize)] = &[("smileys", 3), ("objects", 3), ("places", 2), ("nature", 2)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

impl Category {
    pub fn new(name: &str, glyphs: &[&str]) -> Self {
        Category {
            name: name.to_string(),
            symbols: glyphs.iter().map(|g| Symbol::from(*g)).collect(),
        }
    }
}

/// How many keys a category contributes to a composed keypad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioEntry {
    pub category: String,
    pub count: usize,
}

/// On-disk shape of a vocabulary table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub ratio: Vec<RatioEntry>,
    #[serde(default = "default_use_ratio")]
    pub use_ratio: bool,
}

fn default_use_ratio() -> bool {
    true
}

/// The static symbol table keypads are composed from.
///
/// Categories keep their declared order; the ratio is walked in its declared
/// order when composing. `symbols()` is the flattened, de-duplicated table.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    categories: Vec<Category>,
    ratio: Vec<RatioEntry>,
    use_ratio: bool,
    all: Vec<Symbol>,
}

impl Vocabulary {
    pub fn new(categories: Vec<Category>, ratio: Vec<RatioEntry>, use_ratio: bool) -> Result<Self, PinError> {
        let all = flatten(&categories);
        if all.len() < KEYPAD_SIZE {
            return Err(PinError::VocabularyTooSmall { distinct: all.len() });
        }

        if use_ratio {
            let sum: usize = ratio.iter().map(|r| r.count).sum();
            if sum != KEYPAD_SIZE {
                return Err(PinError::InvalidRatio { sum });
            }
        }

        Ok(Vocabulary {
            categories,
            ratio,
            use_ratio,
            all,
        })
    }

    /// The built-in four-category table with a 3/3/2/2 ratio.
    pub fn standard() -> Self {
        let categories = vec![
            Category::new("smileys", SMILEYS),
            Category::new("objects", OBJECTS),
            Category::new("places", PLACES),
            Category::new("nature", NATURE),
        ];
        let ratio = STANDARD_RATIO
            .iter()
            .map(|(name, count)| RatioEntry {
                category: name.to_string(),
                count: *count,
            })
            .collect();
        let all = flatten(&categories);
        Vocabulary {
            categories,
            ratio,
            use_ratio: true,
            all,
        }
    }

    /// Load a vocabulary table from JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read vocabulary file: {:?}", path.as_ref()))?;

        let config: VocabularyConfig =
            serde_json::from_str(&content).context("Failed to parse vocabulary JSON")?;

        Ok(Vocabulary::new(config.categories, config.ratio, config.use_ratio)?)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn ratio(&self) -> &[RatioEntry] {
        &self.ratio
    }

    pub fn uses_ratio(&self) -> bool {
        self.use_ratio
    }

    /// Every distinct symbol, in category order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.all
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Name of the first category containing `symbol`.
    pub fn category_of(&self, symbol: &Symbol) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.symbols.contains(symbol))
            .map(|c| c.name.as_str())
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.all.contains(symbol)
    }

    /// Split a stored passcode string back into symbols.
    ///
    /// Longest match wins against the vocabulary and the ten digits; any
    /// character matching neither becomes a symbol of its own.
    pub fn segment(&self, joined: &str) -> Vec<Symbol> {
        let mut known: Vec<&str> = self
            .all
            .iter()
            .map(Symbol::as_str)
            .chain(DIGIT_KEYS.iter().copied())
            .filter(|k| !k.is_empty())
            .collect();
        known.sort_by_key(|k| Reverse(k.len()));

        let mut out = Vec::new();
        let mut rest = joined;
        while !rest.is_empty() {
            let take = match known.iter().find(|k| rest.starts_with(**k)) {
                Some(hit) => hit.len(),
                None => rest.chars().next().map(char::len_utf8).unwrap_or(rest.len()),
            };
            out.push(Symbol::new(&rest[..take]));
            rest = &rest[take..];
        }
        out
    }
}

fn flatten(categories: &[Category]) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    categories
        .iter()
        .flat_map(|c| c.symbols.iter())
        .filter(|s| seen.insert(*s))
        .cloned()
        .collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_shape() {
        let vocab = Vocabulary::standard();
        assert_eq!(vocab.categories().len(), 4);
        assert_eq!(vocab.symbols().len(), 12 + 6 + 6 + 7);
        assert_eq!(vocab.ratio().iter().map(|r| r.count).sum::<usize>(), KEYPAD_SIZE);
        assert!(vocab.uses_ratio());
    }

    #[test]
    fn test_standard_table_passes_validation() {
        let vocab = Vocabulary::standard();
        let checked = Vocabulary::new(
            vocab.categories().to_vec(),
            vocab.ratio().to_vec(),
            true,
        );
        assert!(checked.is_ok());
    }

    #[test]
    fn test_ratio_must_sum_to_keypad_size() {
        let vocab = Vocabulary::standard();
        let mut ratio = vocab.ratio().to_vec();
        ratio[0].count += 1;
        let result = Vocabulary::new(vocab.categories().to_vec(), ratio, true);
        assert_eq!(result.unwrap_err(), PinError::InvalidRatio { sum: 11 });
    }

    #[test]
    fn test_ratio_ignored_when_disabled() {
        let vocab = Vocabulary::standard();
        let result = Vocabulary::new(vocab.categories().to_vec(), Vec::new(), false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_too_few_symbols_rejected() {
        let categories = vec![Category::new("tiny", &["🔥", "🌙", "🔥"])];
        let result = Vocabulary::new(categories, Vec::new(), false);
        assert_eq!(result.unwrap_err(), PinError::VocabularyTooSmall { distinct: 2 });
    }

    #[test]
    fn test_category_of() {
        let vocab = Vocabulary::standard();
        assert_eq!(vocab.category_of(&Symbol::from("🔒")), Some("objects"));
        assert_eq!(vocab.category_of(&Symbol::from("x")), None);
    }

    #[test]
    fn test_segment_emoji_and_digits() {
        let vocab = Vocabulary::standard();
        let parts = vocab.segment("🔥🌙🔥⭐");
        let expected: Vec<Symbol> = ["🔥", "🌙", "🔥", "⭐"].iter().map(|s| Symbol::from(*s)).collect();
        assert_eq!(parts, expected);

        let digits = vocab.segment("0427");
        assert_eq!(digits.len(), 4);
        assert_eq!(digits[3], Symbol::from("7"));
    }

    #[test]
    fn test_segment_prefers_longest_match() {
        let categories = vec![Category::new(
            "mixed",
            &["❤", "❤️", "a", "b", "c", "d", "e", "f", "g", "h"],
        )];
        let vocab = Vocabulary::new(categories, Vec::new(), false).unwrap();
        let parts = vocab.segment("❤️❤");
        assert_eq!(parts, vec![Symbol::from("❤️"), Symbol::from("❤")]);
    }

    #[test]
    fn test_segment_unknown_characters() {
        let vocab = Vocabulary::standard();
        let parts = vocab.segment("z🔥");
        assert_eq!(parts, vec![Symbol::from("z"), Symbol::from("🔥")]);
    }

    #[test]
    fn test_config_json_roundtrip_validates() {
        let json = r#"{
            "categories": [
                {"name": "a", "symbols": ["1a","2a","3a","4a","5a"]},
                {"name": "b", "symbols": ["1b","2b","3b","4b","5b"]}
            ],
            "ratio": [{"category": "a", "count": 5}, {"category": "b", "count": 5}]
        }"#;
        let config: VocabularyConfig = serde_json::from_str(json).unwrap();
        assert!(config.use_ratio);
        let vocab = Vocabulary::new(config.categories, config.ratio, config.use_ratio).unwrap();
        assert_eq!(vocab.symbols().len(), 10);
    }
}
