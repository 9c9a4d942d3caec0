//! Emoji and digit passcode registration for usability studies.
//!
//! A participant registers with a generated four-symbol passcode, confirms it
//! on a ten-key keypad and later logs in on a keypad rebuilt from the stored
//! record. With experiment mode on every emoji registration shares one fixed
//! keypad so participants in a run see the same key set.

pub mod auth;
pub mod cli;
pub mod exits;
pub mod pin;
pub mod rand;
pub mod session;
pub mod settings;
pub mod store;
pub mod terminal;
pub mod tui;
