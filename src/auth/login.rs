//! Login against the stored registration.

use super::{AuthError, InputBuffer};
use crate::pin::{PIN_LENGTH, Symbol, resolve_render_keys};
use crate::session::Session;
use crate::store::{RegistrationRecord, RegistrationStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    /// Wrong passcode; input cleared.
    Mismatch,
    /// Fewer than `PIN_LENGTH` keys entered; nothing checked or recorded.
    Incomplete,
}

impl LoginOutcome {
    pub fn message(&self) -> String {
        match self {
            LoginOutcome::Success => "Login successful ✅".to_string(),
            LoginOutcome::Mismatch => "Incorrect password, try again.".to_string(),
            LoginOutcome::Incomplete => format!("Please enter {} characters", PIN_LENGTH),
        }
    }
}

pub struct LoginFlow {
    record: RegistrationRecord,
    keys: Vec<Symbol>,
    input: InputBuffer,
}

impl LoginFlow {
    /// Load the registration and rebuild a keypad it can be entered on.
    ///
    /// The keypad follows the record's own password type and keypad snapshot,
    /// so it matches what was shown at confirmation.
    pub fn open(
        store: &dyn RegistrationStore,
        session: &mut Session,
        participant_id: Option<&str>,
    ) -> Result<Self, AuthError> {
        let record = store
            .read_registration(participant_id)
            .ok_or(AuthError::NotRegistered)?;

        let required = session.vocabulary().segment(&record.generated_password);
        let mode = session.experiment_mode();
        let keys = resolve_render_keys(
            session,
            mode,
            record.password_type,
            &required,
            record.generated_keypad.as_deref(),
        );

        Ok(LoginFlow {
            record,
            keys,
            input: InputBuffer::new(),
        })
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    pub fn keys(&self) -> &[Symbol] {
        &self.keys
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    pub fn press_slot(&mut self, slot: char) -> bool {
        self.input.press_slot(&self.keys, slot)
    }

    /// Check the entered keys. The attempt is recorded best-effort; a failing
    /// analytics sink never changes the outcome.
    pub fn submit(&mut self, store: &mut dyn RegistrationStore, session: &mut Session) -> LoginOutcome {
        if self.input.len() != PIN_LENGTH {
            return LoginOutcome::Incomplete;
        }

        let success = self.input.joined() == self.record.generated_password;
        if success {
            session.set_logged_in(true);
        } else {
            self.input.clear();
        }

        if !self.record.participant_id.is_empty() {
            let _ = store.record_login_attempt(&self.record.participant_id, success);
        }

        if success {
            LoginOutcome::Success
        } else {
            LoginOutcome::Mismatch
        }
    }
}
