//! In-process store. Nothing outlives the process.

use std::collections::BTreeMap;

use anyhow::{Result, bail};

use super::{LoginAttempt, RegistrationRecord, RegistrationStore, SaveResult, StorageKind, newest};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, RegistrationRecord>,
    attempts: Vec<LoginAttempt>,
    fail_saves: bool,
    fail_attempts: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save report failure.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Make every following attempt recording return an error.
    pub fn set_fail_attempts(&mut self, fail: bool) {
        self.fail_attempts = fail;
    }

    pub fn login_attempts(&self) -> &[LoginAttempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RegistrationStore for MemoryStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }

    fn save_registration(&mut self, record: &RegistrationRecord) -> SaveResult {
        if !self.fail_saves {
            self.records
                .insert(record.participant_id.clone(), record.clone());
        }
        SaveResult {
            success: !self.fail_saves,
            storage: StorageKind::Memory,
        }
    }

    fn read_registration(&self, participant_id: Option<&str>) -> Option<RegistrationRecord> {
        match participant_id {
            Some(id) => self.records.get(id).cloned(),
            None => newest(self.records.values()).cloned(),
        }
    }

    fn record_login_attempt(&mut self, participant_id: &str, success: bool) -> Result<()> {
        if self.fail_attempts {
            bail!("login attempt sink unavailable");
        }
        self.attempts.push(LoginAttempt::new(participant_id, success));
        Ok(())
    }
}
