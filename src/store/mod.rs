//! Registration storage.
//!
//! The flows only see the [`RegistrationStore`] trait; which backend sits
//! behind it is chosen by the caller.

mod local;
mod memory;

use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pin::{PasswordType, Symbol};

pub use local::LocalStore;
pub use memory::MemoryStore;

/// Written once when a registration is confirmed; never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub participant_id: String,
    pub username: String,
    pub password_type: PasswordType,
    /// The passcode joined into one string.
    pub generated_password: String,
    /// Keypad shown at registration; absent for digit passcodes.
    #[serde(default)]
    pub generated_keypad: Option<Vec<Symbol>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    pub id: Uuid,
    pub participant_id: String,
    pub success: bool,
    pub at: DateTime<Utc>,
}

impl LoginAttempt {
    pub fn new(participant_id: &str, success: bool) -> Self {
        LoginAttempt {
            id: Uuid::new_v4(),
            participant_id: participant_id.to_string(),
            success,
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Memory,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageKind::Local => "local",
            StorageKind::Memory => "memory",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveResult {
    pub success: bool,
    pub storage: StorageKind,
}

pub trait RegistrationStore {
    fn kind(&self) -> StorageKind;

    /// Store `record` under its participant id, replacing any earlier one.
    fn save_registration(&mut self, record: &RegistrationRecord) -> SaveResult;

    /// The record for `participant_id`, or the newest record when `None`.
    /// Missing or unreadable data reads as `None`.
    fn read_registration(&self, participant_id: Option<&str>) -> Option<RegistrationRecord>;

    /// Analytics sink. Callers are expected to ignore the error.
    fn record_login_attempt(&mut self, participant_id: &str, success: bool) -> Result<()>;
}

/// Newest record by creation time.
fn newest<'a, I>(records: I) -> Option<&'a RegistrationRecord>
where
    I: IntoIterator<Item = &'a RegistrationRecord>,
{
    records.into_iter().max_by_key(|r| r.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_field_names() {
        let record = RegistrationRecord {
            participant_id: "p1".into(),
            username: "ada".into(),
            password_type: PasswordType::Emoji,
            generated_password: "🔥🌙🔥⭐".into(),
            generated_keypad: Some(vec![Symbol::from("🔥")]),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        for key in [
            "participant_id",
            "username",
            "password_type",
            "generated_password",
            "generated_keypad",
            "created_at",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["password_type"], "emoji");
        assert_eq!(value["generated_keypad"][0], "🔥");
    }

    #[test]
    fn test_record_without_keypad_field() {
        let json = r#"{
            "participant_id": "p1",
            "username": "ada",
            "password_type": "digits",
            "generated_password": "0427",
            "created_at": "2026-01-02T03:04:05Z"
        }"#;
        let record: RegistrationRecord = serde_json::from_str(json).unwrap();
        assert!(record.generated_keypad.is_none());
        assert_eq!(record.password_type, PasswordType::Digits);
    }
}
