//! On-screen keypad for passcode confirmation and login.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, read};

use super::{print_keypad_screen, spaced};
use crate::auth::input::slot_index;
use crate::auth::{ConfirmOutcome, LoginFlow, LoginOutcome, RegistrationFlow};
use crate::pin::PIN_LENGTH;
use crate::session::Session;
use crate::store::{RegistrationStore, StorageKind};
use crate::terminal::{RawModeGuard, reset_terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Slot(char),
    Backspace,
    Clear,
    Submit,
    Cancel,
}

/// Block until a keypad-relevant key is pressed.
pub fn read_key() -> KeyAction {
    let Ok(_guard) = RawModeGuard::new() else {
        return KeyAction::Cancel;
    };

    loop {
        let key_event = match read() {
            Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => k,
            Ok(_) => continue,
            Err(_) => return KeyAction::Cancel,
        };
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Char('c') if ctrl => {
                reset_terminal();
                println!();
                std::process::exit(0);
            }
            KeyCode::Char('u') if ctrl => return KeyAction::Clear,
            KeyCode::Delete => return KeyAction::Clear,
            KeyCode::Backspace => return KeyAction::Backspace,
            KeyCode::Enter => return KeyAction::Submit,
            KeyCode::Esc => return KeyAction::Cancel,
            KeyCode::Char(c) if slot_index(c).is_some() => return KeyAction::Slot(c),
            _ => {}
        }
    }
}

/// Confirm the pending registration on the keypad. Returns where the record
/// was saved, or `None` if the participant backed out.
pub fn confirm_screen(
    flow: &mut RegistrationFlow,
    store: &mut dyn RegistrationStore,
) -> Option<StorageKind> {
    let mut message = String::new();

    loop {
        let pending = flow.pending_mut()?;
        let lines = [
            format!("Participant: {}", pending.record().participant_id),
            format!("Your passcode: {}", spaced(pending.passcode().symbols())),
            "Type it on the keypad, then press Enter.".to_string(),
        ];
        print_keypad_screen("Confirm passcode", &lines, pending.keys(), pending.input(), &message);
        message.clear();

        match read_key() {
            KeyAction::Slot(c) => {
                pending.press_slot(c);
            }
            KeyAction::Backspace => {
                pending.input_mut().backspace();
            }
            KeyAction::Clear => pending.input_mut().clear(),
            KeyAction::Cancel => {
                flow.abandon();
                return None;
            }
            KeyAction::Submit if !pending.input().is_complete() => {
                message = format!("Please enter {} characters", PIN_LENGTH);
            }
            KeyAction::Submit => match flow.confirm(store) {
                Ok(ConfirmOutcome::Registered(kind)) => return Some(kind),
                Ok(ConfirmOutcome::Mismatch) => {
                    message = "Passcode does not match, try again.".to_string();
                }
                Ok(ConfirmOutcome::SaveFailed) => {
                    message = "Could not save registration. Press Enter to retry.".to_string();
                }
                Err(e) => {
                    message = e.to_string();
                }
            },
        }
    }
}

/// Enter the passcode on the login keypad until success or Esc.
pub fn login_screen(
    flow: &mut LoginFlow,
    store: &mut dyn RegistrationStore,
    session: &mut Session,
) -> bool {
    let mut message = String::new();
    let lines = [
        format!("Welcome back, {}", flow.record().username),
        "Enter your passcode, then press Enter.".to_string(),
    ];

    loop {
        print_keypad_screen("Login", &lines, flow.keys(), flow.input(), &message);
        message.clear();

        match read_key() {
            KeyAction::Slot(c) => {
                flow.press_slot(c);
            }
            KeyAction::Backspace => {
                flow.input_mut().backspace();
            }
            KeyAction::Clear => flow.input_mut().clear(),
            KeyAction::Cancel => return false,
            KeyAction::Submit => {
                let outcome = flow.submit(store, session);
                if outcome == LoginOutcome::Success {
                    return true;
                }
                message = outcome.message();
            }
        }
    }
}
