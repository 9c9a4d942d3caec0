//! Settings file persistence.
//!
//! One JSON object whose keys are all prefixed with the crate namespace.
//! Keys are read one at a time: a malformed value only resets that key.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::Settings;
use crate::cli::prompts;

pub const NAMESPACE: &str = "emojipin";

const KEY_EXPERIMENT_MODE: &str = "emojipin.experiment_mode";
const KEY_CONDITION: &str = "emojipin.experiment_condition";
const KEY_FIXED_KEYPAD: &str = "emojipin.fixed_keypad";
const KEY_GENERATION: &str = "emojipin.experiment_generation";
const KEY_LOGGED_IN: &str = "emojipin.logged_in";

pub fn save(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
    }

    let mut map = Map::new();
    map.insert(KEY_EXPERIMENT_MODE.into(), Value::Bool(settings.experiment_mode));
    map.insert(KEY_CONDITION.into(), serde_json::to_value(settings.condition)?);
    map.insert(KEY_GENERATION.into(), Value::from(settings.experiment_generation));
    map.insert(KEY_LOGGED_IN.into(), Value::Bool(settings.logged_in));
    if let Some(fixed) = &settings.fixed_keypad {
        map.insert(KEY_FIXED_KEYPAD.into(), serde_json::to_value(fixed)?);
    }

    let data = serde_json::to_string_pretty(&Value::Object(map))?;
    fs::write(path, data).with_context(|| format!("Failed to write settings file: {:?}", path))?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Settings> {
    if !path.exists() {
        let settings = Settings::default();
        save(&settings, path)?;
        return Ok(settings);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;
    Ok(parse(&content))
}

/// Parse settings text, falling back to defaults for anything unreadable.
pub fn parse(content: &str) -> Settings {
    let defaults = Settings::default();

    let map = match serde_json::from_str::<Map<String, Value>>(content) {
        Ok(map) => map,
        Err(e) => {
            prompts::warn(&format!("Settings file is not valid JSON ({e}); using defaults"));
            return defaults;
        }
    };

    Settings {
        experiment_mode: field(&map, KEY_EXPERIMENT_MODE).unwrap_or(defaults.experiment_mode),
        condition: field(&map, KEY_CONDITION).unwrap_or(defaults.condition),
        fixed_keypad: field(&map, KEY_FIXED_KEYPAD),
        experiment_generation: field(&map, KEY_GENERATION).unwrap_or(defaults.experiment_generation),
        logged_in: field(&map, KEY_LOGGED_IN).unwrap_or(defaults.logged_in),
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
}
