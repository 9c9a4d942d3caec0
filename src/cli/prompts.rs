//! Centralized warning, error and status messages.

use super::quiet;
use crate::terminal::paint;

// ANSI color codes
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";

/// Warning to stderr, yellow on a terminal. Suppressed in quiet mode.
pub fn warn(msg: &str) {
    if !quiet::enabled() {
        eprintln!("{}", paint(YELLOW, msg, quiet::is_stderr_tty()));
    }
}

/// Error to stderr, red on a terminal. Never suppressed.
pub fn error(msg: &str) {
    eprintln!("{}", paint(RED, msg, quiet::is_stderr_tty()));
}

/// Status line to stdout. Suppressed in quiet mode.
pub fn info(msg: &str) {
    if !quiet::enabled() {
        println!("{msg}");
    }
}

/// Success line to stdout, green on a terminal. Suppressed in quiet mode.
pub fn success(msg: &str) {
    if !quiet::enabled() {
        println!("{}", paint(GREEN, msg, quiet::is_stdout_tty()));
    }
}

pub fn mlock_failed() {
    warn("Warning: mlock failed - entropy pool may be swapped to disk.");
    warn("Fix: ulimit -l unlimited, or setcap cap_ipc_lock=ep on binary");
}

pub fn urandom_unavailable() {
    warn("Warning: /dev/urandom not available, using hardware entropy");
}

pub fn usage_hint() {
    error("Run `emojipin --help` for usage.");
}
