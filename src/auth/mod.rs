//! Credential lifecycle: register, confirm, log in, log out.
//!
//! `Unregistered -> Pending -> Registered`. A pending registration lives only
//! in its [`RegistrationFlow`]; once confirmed the record belongs to the store.

pub mod input;
mod login;
mod register;

use std::fmt;

use crate::pin::PinError;
use crate::session::Session;

pub use input::InputBuffer;
pub use login::{LoginFlow, LoginOutcome};
pub use register::{ConfirmOutcome, CredentialState, PendingRegistration, RegistrationFlow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Participant id or username blank after trimming.
    MissingIdentity,
    /// Nothing to log in against.
    NotRegistered,
    NoPendingRegistration,
    Pin(PinError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingIdentity => write!(f, "Participant id and username are required"),
            AuthError::NotRegistered => write!(f, "No registration found. Please register first."),
            AuthError::NoPendingRegistration => write!(f, "No passcode has been generated yet"),
            AuthError::Pin(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<PinError> for AuthError {
    fn from(e: PinError) -> Self {
        AuthError::Pin(e)
    }
}

pub fn is_logged_in(session: &Session) -> bool {
    session.settings().logged_in
}

pub fn logout(session: &mut Session) {
    session.set_logged_in(false);
}
