//! Session context: the persisted flags plus the vocabulary, with the
//! fixed-keypad cache for experiment runs.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::prompts;
use crate::pin::{Keypad, PasswordType, Symbol, Vocabulary, compose};
use crate::settings::{FixedKeypad, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentMode {
    On,
    Off,
}

impl ExperimentMode {
    pub fn from_flag(on: bool) -> Self {
        if on { ExperimentMode::On } else { ExperimentMode::Off }
    }
}

impl fmt::Display for ExperimentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExperimentMode::On => "on",
            ExperimentMode::Off => "off",
        })
    }
}

/// Settings and vocabulary for one run.
///
/// Every mutation is written straight back to the settings file when the
/// session has one. Write failures are reported and the in-memory state kept.
pub struct Session {
    settings: Settings,
    vocab: Vocabulary,
    path: Option<PathBuf>,
}

impl Session {
    /// Session backed by the settings file at `path`.
    pub fn open(path: impl Into<PathBuf>, vocab: Vocabulary) -> Self {
        let path = path.into();
        let settings = Settings::load(&path).unwrap_or_else(|e| {
            prompts::warn(&format!("Failed to load settings: {e:#}"));
            Settings::default()
        });
        Session {
            settings,
            vocab,
            path: Some(path),
        }
    }

    /// Session with default settings that never touches disk.
    pub fn in_memory(vocab: Vocabulary) -> Self {
        Self::with_settings(Settings::default(), vocab)
    }

    pub fn with_settings(settings: Settings, vocab: Vocabulary) -> Self {
        Session {
            settings,
            vocab,
            path: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn experiment_mode(&self) -> ExperimentMode {
        ExperimentMode::from_flag(self.settings.experiment_mode)
    }

    pub fn condition(&self) -> PasswordType {
        self.settings.condition
    }

    /// Turning the mode off drops the fixed keypad; turning it back on starts
    /// a new experiment generation, so the next request composes a new one.
    pub fn set_experiment_mode(&mut self, mode: ExperimentMode) {
        match mode {
            ExperimentMode::Off => {
                self.settings.experiment_mode = false;
                self.settings.fixed_keypad = None;
            }
            ExperimentMode::On => {
                if !self.settings.experiment_mode {
                    self.settings.experiment_generation += 1;
                }
                self.settings.experiment_mode = true;
            }
        }
        self.persist();
    }

    pub fn set_condition(&mut self, condition: PasswordType) {
        self.settings.condition = condition;
        self.persist();
    }

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.settings.logged_in = logged_in;
        self.persist();
    }

    /// The experiment's fixed keypad, composed and stored on first use in the
    /// current generation. A stored keypad with keys outside the loaded
    /// vocabulary is recomposed.
    pub fn fixed_keypad(&mut self) -> Keypad {
        let generation = self.settings.experiment_generation;
        if let Some(fixed) = &self.settings.fixed_keypad
            && fixed.generation == generation
            && fixed.keys.symbols().iter().all(|s| self.vocab.contains(s))
        {
            return fixed.keys.clone();
        }

        let keys = compose(&self.vocab);
        self.settings.fixed_keypad = Some(FixedKeypad {
            generation,
            keys: keys.clone(),
        });
        self.persist();
        keys
    }

    /// Symbols a new emoji passcode may be drawn from: the whole vocabulary
    /// with experiment mode off, the fixed keypad with it on.
    pub fn keypad_pool(&mut self) -> Vec<Symbol> {
        match self.experiment_mode() {
            ExperimentMode::Off => self.vocab.symbols().to_vec(),
            ExperimentMode::On => self.fixed_keypad().into_symbols(),
        }
    }

    fn persist(&self) {
        if let Some(path) = &self.path
            && let Err(e) = self.settings.save(path)
        {
            prompts::warn(&format!("Failed to save settings: {e:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("emojipin-session-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let session = Session::in_memory(Vocabulary::standard());
        assert_eq!(session.experiment_mode(), ExperimentMode::On);
        assert_eq!(session.condition(), PasswordType::Emoji);
        assert!(session.path().is_none());
    }

    #[test]
    fn test_pool_is_vocabulary_when_off() {
        let mut session = Session::in_memory(Vocabulary::standard());
        session.set_experiment_mode(ExperimentMode::Off);
        assert_eq!(session.keypad_pool(), Vocabulary::standard().symbols().to_vec());
        assert!(session.settings().fixed_keypad.is_none());
    }

    #[test]
    fn test_pool_is_stable_while_on() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let first = session.keypad_pool();
        let second = session.keypad_pool();
        assert_eq!(first.len(), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_toggle_off_on_invalidates_cache() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let _ = session.keypad_pool();
        let generation = session.settings().experiment_generation;

        session.set_experiment_mode(ExperimentMode::Off);
        assert!(session.settings().fixed_keypad.is_none());
        session.set_experiment_mode(ExperimentMode::On);
        assert_eq!(session.settings().experiment_generation, generation + 1);
        assert!(session.settings().fixed_keypad.is_none());

        let _ = session.keypad_pool();
        let fixed = session.settings().fixed_keypad.as_ref().unwrap();
        assert_eq!(fixed.generation, generation + 1);
    }

    #[test]
    fn test_setting_on_twice_keeps_keypad() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let first = session.keypad_pool();
        session.set_experiment_mode(ExperimentMode::On);
        assert_eq!(session.keypad_pool(), first);
        assert_eq!(session.settings().experiment_generation, 0);
    }

    #[test]
    fn test_stale_generation_recomposed() {
        let settings = Settings {
            fixed_keypad: Some(FixedKeypad {
                generation: 1,
                keys: Keypad::digits(),
            }),
            experiment_generation: 2,
            ..Settings::default()
        };
        let mut session = Session::with_settings(settings, Vocabulary::standard());
        let keys = session.fixed_keypad();
        assert_ne!(keys, Keypad::digits());
        assert_eq!(session.settings().fixed_keypad.as_ref().unwrap().generation, 2);
    }

    #[test]
    fn test_keys_outside_vocabulary_recomposed() {
        let settings = Settings {
            fixed_keypad: Some(FixedKeypad {
                generation: 0,
                keys: Keypad::digits(),
            }),
            experiment_generation: 0,
            ..Settings::default()
        };
        let vocab = Vocabulary::standard();
        let mut session = Session::with_settings(settings, vocab.clone());
        let keys = session.fixed_keypad();
        assert_ne!(keys, Keypad::digits());
        assert!(keys.symbols().iter().all(|s| vocab.contains(s)));

        let stored = session.settings().fixed_keypad.as_ref().unwrap();
        assert_eq!(stored.generation, 0);
        assert_eq!(stored.keys, keys);
        assert_eq!(session.fixed_keypad(), keys);
    }

    #[test]
    fn test_fixed_keypad_survives_reopen() {
        let path = scratch_path();
        let first = {
            let mut session = Session::open(&path, Vocabulary::standard());
            session.keypad_pool()
        };
        let mut reopened = Session::open(&path, Vocabulary::standard());
        assert_eq!(reopened.keypad_pool(), first);

        reopened.set_experiment_mode(ExperimentMode::Off);
        let closed = Session::open(&path, Vocabulary::standard());
        assert_eq!(closed.experiment_mode(), ExperimentMode::Off);
        assert!(closed.settings().fixed_keypad.is_none());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
