//! Persisted local flags: experiment mode, password-type condition,
//! the fixed keypad snapshot and login state.

mod file;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::pin::{Keypad, PasswordType};

pub use file::{NAMESPACE, parse};

const SETTINGS_FILE: &str = "settings.json";

/// The keypad fixed for one experiment run. Only valid while `generation`
/// matches the settings' current experiment generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedKeypad {
    pub generation: u64,
    pub keys: Keypad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub experiment_mode: bool,
    pub condition: PasswordType,
    pub fixed_keypad: Option<FixedKeypad>,
    /// Bumped each time experiment mode goes from off to on.
    pub experiment_generation: u64,
    pub logged_in: bool,
}

impl Settings {
    /// Load settings from `path`, creating the file with defaults if missing.
    pub fn load(path: &Path) -> Result<Self> {
        file::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        file::save(self, path)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            experiment_mode: true,
            condition: PasswordType::Emoji,
            fixed_keypad: None,
            experiment_generation: 0,
            logged_in: false,
        }
    }
}

/// Directory holding settings and the local store.
///
/// `$EMOJIPIN_HOME` wins, then `$HOME/.config/emojipin`, then `./.emojipin`.
pub fn default_home() -> PathBuf {
    if let Ok(dir) = env::var("EMOJIPIN_HOME")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".config").join(NAMESPACE),
        Err(_) => PathBuf::from(".").join(format!(".{NAMESPACE}")),
    }
}

pub fn settings_path(home: &Path) -> PathBuf {
    home.join(SETTINGS_FILE)
}
