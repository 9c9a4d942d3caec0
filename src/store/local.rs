//! Directory-backed store: registrations in one JSON file, login attempts
//! appended as JSON lines.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LoginAttempt, RegistrationRecord, RegistrationStore, SaveResult, StorageKind, newest};
use crate::cli::prompts;

const REGISTRATIONS_FILE: &str = "registrations.json";
const ATTEMPTS_FILE: &str = "login_attempts.jsonl";
const UNREADABLE_SUFFIX: &str = ".unreadable";

/// Records are kept as raw JSON and decoded one at a time, so a damaged
/// entry hides only itself and is written back untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistrationFile {
    #[serde(default)]
    records: BTreeMap<String, Value>,
}

impl RegistrationFile {
    fn get(&self, participant_id: &str) -> Option<RegistrationRecord> {
        let value = self.records.get(participant_id)?;
        serde_json::from_value(value.clone()).ok()
    }

    fn decoded(&self) -> Vec<RegistrationRecord> {
        self.records
            .values()
            .filter_map(|value| serde_json::from_value(value.clone()).ok())
            .collect()
    }
}

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn registrations_path(&self) -> PathBuf {
        self.dir.join(REGISTRATIONS_FILE)
    }

    fn attempts_path(&self) -> PathBuf {
        self.dir.join(ATTEMPTS_FILE)
    }

    fn load(&self) -> Result<RegistrationFile> {
        let path = self.registrations_path();
        if !path.exists() {
            return Ok(RegistrationFile::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read registrations: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse registrations JSON")
    }

    fn write(&self, record: &RegistrationRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory: {:?}", self.dir))?;

        let mut file = match self.load() {
            Ok(file) => file,
            Err(e) => {
                let kept = self.set_aside_unreadable()?;
                prompts::warn(&format!(
                    "{e:#}; moved it to {:?} and started a new registrations file",
                    kept
                ));
                RegistrationFile::default()
            }
        };
        file.records
            .insert(record.participant_id.clone(), serde_json::to_value(record)?);

        let path = self.registrations_path();
        let data = serde_json::to_string_pretty(&file)?;
        fs::write(&path, data).with_context(|| format!("Failed to write registrations: {:?}", path))
    }

    /// Move an unparsable registrations file out of the way instead of
    /// overwriting it.
    fn set_aside_unreadable(&self) -> Result<PathBuf> {
        let path = self.registrations_path();
        let kept = self.dir.join(format!("{}{}", REGISTRATIONS_FILE, UNREADABLE_SUFFIX));
        fs::rename(&path, &kept)
            .with_context(|| format!("Failed to move unreadable registrations: {:?}", path))?;
        Ok(kept)
    }

    /// Every recorded login attempt, oldest first. Unparsable lines are skipped.
    pub fn login_attempts(&self) -> Result<Vec<LoginAttempt>> {
        let path = self.attempts_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read login attempts: {:?}", path))?;
        Ok(content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

impl RegistrationStore for LocalStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }

    fn save_registration(&mut self, record: &RegistrationRecord) -> SaveResult {
        let success = match self.write(record) {
            Ok(()) => true,
            Err(e) => {
                prompts::warn(&format!("Failed to save registration: {e:#}"));
                false
            }
        };
        SaveResult {
            success,
            storage: StorageKind::Local,
        }
    }

    fn read_registration(&self, participant_id: Option<&str>) -> Option<RegistrationRecord> {
        let file = self.load().ok()?;
        match participant_id {
            Some(id) => file.get(id),
            None => newest(&file.decoded()).cloned(),
        }
    }

    fn record_login_attempt(&mut self, participant_id: &str, success: bool) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let attempt = LoginAttempt::new(participant_id, success);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.attempts_path())
            .context("Failed to open login attempts log")?;
        writeln!(file, "{}", serde_json::to_string(&attempt)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::PasswordType;
    use chrono::{Duration, Utc};

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("emojipin-store-{}", uuid::Uuid::new_v4()))
    }

    fn record(id: &str, password: &str, minutes_ago: i64) -> RegistrationRecord {
        RegistrationRecord {
            participant_id: id.into(),
            username: format!("user-{id}"),
            password_type: PasswordType::Digits,
            generated_password: password.into(),
            generated_keypad: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_empty_store_reads_none() {
        let store = LocalStore::new(scratch_dir());
        assert!(store.read_registration(None).is_none());
        assert!(store.read_registration(Some("p1")).is_none());
        assert!(store.login_attempts().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = scratch_dir();
        let mut store = LocalStore::new(&dir);
        let result = store.save_registration(&record("p1", "1234", 0));
        assert_eq!(
            result,
            SaveResult {
                success: true,
                storage: StorageKind::Local
            }
        );

        let reopened = LocalStore::new(&dir);
        let read = reopened.read_registration(Some("p1")).unwrap();
        assert_eq!(read.generated_password, "1234");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_second_registration_overwrites() {
        let dir = scratch_dir();
        let mut store = LocalStore::new(&dir);
        store.save_registration(&record("p1", "1111", 5));
        store.save_registration(&record("p1", "2222", 0));
        assert_eq!(store.read_registration(Some("p1")).unwrap().generated_password, "2222");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_newest_when_no_id_given() {
        let dir = scratch_dir();
        let mut store = LocalStore::new(&dir);
        store.save_registration(&record("old", "1111", 10));
        store.save_registration(&record("new", "2222", 1));
        store.save_registration(&record("mid", "3333", 5));
        assert_eq!(store.read_registration(None).unwrap().participant_id, "new");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_file_reads_none_and_is_set_aside() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(REGISTRATIONS_FILE), "{{{ nope").unwrap();

        let mut store = LocalStore::new(&dir);
        assert!(store.read_registration(None).is_none());
        assert!(store.save_registration(&record("p1", "1234", 0)).success);
        assert!(store.read_registration(Some("p1")).is_some());

        let kept = dir.join(format!("{}{}", REGISTRATIONS_FILE, UNREADABLE_SUFFIX));
        assert_eq!(fs::read_to_string(kept).unwrap(), "{{{ nope");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_damaged_record_does_not_hide_or_drop_others() {
        let dir = scratch_dir();
        let mut store = LocalStore::new(&dir);
        store.save_registration(&record("p1", "1111", 2));
        store.save_registration(&record("p2", "2222", 1));

        let path = dir.join(REGISTRATIONS_FILE);
        let mut raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        raw["records"]["p2"]["created_at"] = Value::from("garbage");
        fs::write(&path, serde_json::to_string(&raw).unwrap()).unwrap();

        assert_eq!(store.read_registration(Some("p1")).unwrap().generated_password, "1111");
        assert!(store.read_registration(Some("p2")).is_none());
        assert_eq!(store.read_registration(None).unwrap().participant_id, "p1");

        assert!(store.save_registration(&record("p3", "3333", 0)).success);
        assert_eq!(store.read_registration(Some("p1")).unwrap().generated_password, "1111");
        assert_eq!(store.read_registration(Some("p3")).unwrap().generated_password, "3333");

        // The damaged entry is written back as it was
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["records"]["p2"]["created_at"], "garbage");
        assert!(!dir.join(format!("{}{}", REGISTRATIONS_FILE, UNREADABLE_SUFFIX)).exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_save_failure_reported() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        // A plain file where the store directory should be
        let blocked = dir.join("blocked");
        fs::write(&blocked, "").unwrap();

        let mut store = LocalStore::new(&blocked);
        let result = store.save_registration(&record("p1", "1234", 0));
        assert!(!result.success);
        assert_eq!(result.storage, StorageKind::Local);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_login_attempts_appended() {
        let dir = scratch_dir();
        let mut store = LocalStore::new(&dir);
        store.record_login_attempt("p1", false).unwrap();
        store.record_login_attempt("p1", true).unwrap();

        let attempts = store.login_attempts().unwrap();
        assert_eq!(attempts.len(), 2);
        assert!(!attempts[0].success);
        assert!(attempts[1].success);
        assert_ne!(attempts[0].id, attempts[1].id);
        let _ = fs::remove_dir_all(dir);
    }
}
