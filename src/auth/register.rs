//! Registration: generate a passcode, then confirm it by re-entry.

use chrono::Utc;

use super::{AuthError, InputBuffer};
use crate::cli::prompts;
use crate::pin::{
    Keypad, PasswordType, Passcode, Symbol, compose, digit_passcode, emoji_passcode,
    resolve_render_keys,
};
use crate::session::{ExperimentMode, Session};
use crate::store::{RegistrationRecord, RegistrationStore, StorageKind};

/// A generated passcode waiting for the participant to type it back.
#[derive(Debug)]
pub struct PendingRegistration {
    record: RegistrationRecord,
    passcode: Passcode,
    keys: Vec<Symbol>,
    input: InputBuffer,
}

impl PendingRegistration {
    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    pub fn passcode(&self) -> &Passcode {
        &self.passcode
    }

    /// Keys to show on the confirmation keypad.
    pub fn keys(&self) -> &[Symbol] {
        &self.keys
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// Press the key at `slot` on the confirmation keypad.
    pub fn press_slot(&mut self, slot: char) -> bool {
        self.input.press_slot(&self.keys, slot)
    }
}

#[derive(Debug)]
pub enum CredentialState {
    Unregistered,
    Pending(PendingRegistration),
    Registered(RegistrationRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Registered(StorageKind),
    /// Input did not match; it has been cleared for another try.
    Mismatch,
    /// The store refused the record; confirming again retries the save.
    SaveFailed,
}

#[derive(Debug)]
pub struct RegistrationFlow {
    state: CredentialState,
}

impl RegistrationFlow {
    pub fn new() -> Self {
        RegistrationFlow {
            state: CredentialState::Unregistered,
        }
    }

    pub fn state(&self) -> &CredentialState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingRegistration> {
        match &self.state {
            CredentialState::Pending(p) => Some(p),
            _ => None,
        }
    }

    pub fn pending_mut(&mut self) -> Option<&mut PendingRegistration> {
        match &mut self.state {
            CredentialState::Pending(p) => Some(p),
            _ => None,
        }
    }

    /// Generate a passcode and its confirmation keypad. Nothing is saved yet.
    ///
    /// Emoji passcodes are drawn from a keypad: the experiment's fixed keypad
    /// when experiment mode is on, a freshly composed one otherwise. That
    /// keypad becomes the record's snapshot and is what login shows later.
    pub fn generate(
        &mut self,
        session: &mut Session,
        participant_id: &str,
        username: &str,
        password_type: PasswordType,
    ) -> Result<&PendingRegistration, AuthError> {
        let participant_id = participant_id.trim();
        let username = username.trim();
        if participant_id.is_empty() || username.is_empty() {
            return Err(AuthError::MissingIdentity);
        }

        let mode = session.experiment_mode();
        let keypad = match password_type {
            PasswordType::Emoji => Some(match mode {
                ExperimentMode::On => session.fixed_keypad(),
                ExperimentMode::Off => compose(session.vocabulary()),
            }),
            PasswordType::Digits => None,
        };

        let passcode = match &keypad {
            Some(k) => emoji_passcode(k.symbols())?,
            None => digit_passcode(),
        };
        let snapshot = keypad.map(Keypad::into_symbols);
        let keys = resolve_render_keys(
            session,
            mode,
            password_type,
            passcode.symbols(),
            snapshot.as_deref(),
        );

        let record = RegistrationRecord {
            participant_id: participant_id.to_string(),
            username: username.to_string(),
            password_type,
            generated_password: passcode.joined(),
            generated_keypad: snapshot,
            created_at: Utc::now(),
        };

        self.state = CredentialState::Pending(PendingRegistration {
            record,
            passcode,
            keys,
            input: InputBuffer::new(),
        });
        self.pending().ok_or(AuthError::NoPendingRegistration)
    }

    /// Compare the typed keys with the pending passcode and save on a match.
    pub fn confirm(&mut self, store: &mut dyn RegistrationStore) -> Result<ConfirmOutcome, AuthError> {
        let CredentialState::Pending(pending) = &mut self.state else {
            return Err(AuthError::NoPendingRegistration);
        };

        if pending.input.joined() != pending.passcode.joined() {
            pending.input.clear();
            return Ok(ConfirmOutcome::Mismatch);
        }

        let result = store.save_registration(&pending.record);
        if !result.success {
            return Ok(ConfirmOutcome::SaveFailed);
        }

        prompts::info(&format!("Registration saved to: {}", result.storage));
        let record = pending.record.clone();
        self.state = CredentialState::Registered(record);
        Ok(ConfirmOutcome::Registered(result.storage))
    }

    /// Drop a pending registration without saving it.
    pub fn abandon(&mut self) {
        if matches!(self.state, CredentialState::Pending(_)) {
            self.state = CredentialState::Unregistered;
        }
    }
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::{KEYPAD_SIZE, Vocabulary};
    use crate::store::MemoryStore;

    fn type_passcode(pending: &mut PendingRegistration) {
        let code: Vec<Symbol> = pending.passcode().symbols().to_vec();
        for symbol in code {
            pending.input_mut().push(symbol);
        }
    }

    #[test]
    fn test_blank_identity_rejected() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let mut flow = RegistrationFlow::new();
        let result = flow.generate(&mut session, "  ", "ada", PasswordType::Digits);
        assert_eq!(result.unwrap_err(), AuthError::MissingIdentity);
        let result = flow.generate(&mut session, "p1", "\t", PasswordType::Digits);
        assert_eq!(result.unwrap_err(), AuthError::MissingIdentity);
        assert!(matches!(flow.state(), CredentialState::Unregistered));
    }

    #[test]
    fn test_identity_trimmed() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let mut flow = RegistrationFlow::new();
        let pending = flow
            .generate(&mut session, " p1 ", " ada ", PasswordType::Digits)
            .unwrap();
        assert_eq!(pending.record().participant_id, "p1");
        assert_eq!(pending.record().username, "ada");
    }

    #[test]
    fn test_digit_registration_has_no_snapshot() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let mut flow = RegistrationFlow::new();
        let pending = flow
            .generate(&mut session, "p1", "ada", PasswordType::Digits)
            .unwrap();
        assert!(pending.record().generated_keypad.is_none());
        assert_eq!(pending.keys(), Keypad::digits().symbols());
    }

    #[test]
    fn test_emoji_registration_experiment_on_uses_fixed_keypad() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let mut flow = RegistrationFlow::new();
        let pool = session.keypad_pool();
        let pending = flow
            .generate(&mut session, "p1", "ada", PasswordType::Emoji)
            .unwrap();
        assert_eq!(pending.keys(), pool.as_slice());
        assert_eq!(pending.record().generated_keypad.as_deref(), Some(pool.as_slice()));
        assert!(pending.passcode().symbols().iter().all(|s| pool.contains(s)));
    }

    #[test]
    fn test_emoji_registration_experiment_off_composes_keypad() {
        let mut session = Session::in_memory(Vocabulary::standard());
        session.set_experiment_mode(ExperimentMode::Off);
        let mut flow = RegistrationFlow::new();
        let pending = flow
            .generate(&mut session, "p1", "ada", PasswordType::Emoji)
            .unwrap();
        assert_eq!(pending.keys().len(), KEYPAD_SIZE);
        assert!(pending.passcode().symbols().iter().all(|s| pending.keys().contains(s)));
        assert!(session.settings().fixed_keypad.is_none());
    }

    #[test]
    fn test_confirm_without_pending() {
        let mut flow = RegistrationFlow::new();
        let mut store = MemoryStore::new();
        assert_eq!(flow.confirm(&mut store), Err(AuthError::NoPendingRegistration));
    }

    #[test]
    fn test_mismatch_clears_input_and_saves_nothing() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let mut store = MemoryStore::new();
        let mut flow = RegistrationFlow::new();
        flow.generate(&mut session, "p1", "ada", PasswordType::Digits).unwrap();

        let pending = flow.pending_mut().unwrap();
        let wrong = if pending.passcode().joined() == "1111" { '2' } else { '1' };
        for _ in 0..4 {
            pending.press_slot(wrong);
        }
        assert_eq!(flow.confirm(&mut store), Ok(ConfirmOutcome::Mismatch));
        assert!(flow.pending().unwrap().input().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_failure_keeps_pending_for_retry() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let mut store = MemoryStore::new();
        store.set_fail_saves(true);
        let mut flow = RegistrationFlow::new();
        flow.generate(&mut session, "p1", "ada", PasswordType::Emoji).unwrap();
        type_passcode(flow.pending_mut().unwrap());

        assert_eq!(flow.confirm(&mut store), Ok(ConfirmOutcome::SaveFailed));
        assert!(flow.pending().is_some());

        store.set_fail_saves(false);
        assert_eq!(
            flow.confirm(&mut store),
            Ok(ConfirmOutcome::Registered(StorageKind::Memory))
        );
        assert!(matches!(flow.state(), CredentialState::Registered(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_abandon_discards_pending() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let mut flow = RegistrationFlow::new();
        flow.generate(&mut session, "p1", "ada", PasswordType::Digits).unwrap();
        flow.abandon();
        assert!(matches!(flow.state(), CredentialState::Unregistered));
    }
}
