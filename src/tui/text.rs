//! Static screens: menu, help, status and the keypad frame.

use crate::auth::{self, InputBuffer};
use crate::cli::quiet;
use crate::pin::{KEYPAD_SIZE, Symbol};
use crate::session::Session;
use crate::store::{RegistrationRecord, StorageKind};
use crate::terminal::{
    BOLD, RED, RESET, box_bottom, box_keypad, box_line, box_line_center, box_opt, box_top,
    clear, paint, print_error, print_rule,
};

pub fn enter_prompt() -> &'static str {
    "Enter choice"
}

/// Symbols separated by spaces so wide glyphs do not run together.
pub fn spaced(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_main_menu(session: &Session, print_invalid: &mut bool) {
    let state = if auth::is_logged_in(session) {
        "logged in"
    } else {
        "logged out"
    };

    box_top("emojipin");
    box_line(&format!(
        "Experiment: {}   Condition: {}   {}",
        session.experiment_mode(),
        session.condition(),
        state
    ));
    print_rule();
    box_line("1. Register");
    box_line("2. Login");
    box_line("3. Logout");
    box_line("4. Toggle experiment mode");
    box_line("5. Switch condition (emoji / digits)");
    box_line("6. Show keypad pool");
    box_line("7. Status");
    box_line("8. Help");
    box_line("9. Exit");
    box_bottom();

    if *print_invalid {
        print_error("Invalid choice.");
        *print_invalid = false;
    } else {
        println!();
    }
}

pub fn print_help() {
    let color = quiet::is_stdout_tty();
    box_top("emojipin - emoji vs. digit passcode study");
    box_line("Usage: emojipin [COMMAND] [OPTIONS]");
    box_line("With no arguments an interactive menu opens.");
    print_rule();
    box_line(&paint(BOLD, "Commands", color));
    box_opt("register", "Generate and confirm a passcode (needs -p and -n)");
    box_opt("login", "Enter the registered passcode (-e or one stdin line)");
    box_opt("experiment [on|off]", "Show or set experiment mode");
    box_opt("condition [TYPE]", "Show or set the password type: emoji or digits");
    box_opt("keypad", "Print the current keypad pool");
    box_opt("status", "Show mode, condition, keypad and registration");
    box_opt("logout", "Clear the logged-in flag");
    print_rule();
    box_line(&paint(BOLD, "Options", color));
    box_opt("-p, --participant ID", "Participant id");
    box_opt("-n, --username NAME", "Username");
    box_opt("-t, --type TYPE", "emoji or digits (default: the condition)");
    box_opt(
        "-e, --entry SLOTS",
        "login only: slots to press, e.g. 3141; 0 picks slot 10",
    );
    box_opt("--home DIR", "Settings and registration directory");
    box_opt("--vocab FILE", "Load the emoji vocabulary from JSON");
    box_opt("-u, --urandom", "Use /dev/urandom entropy");
    box_opt("-q, --quiet", "Suppress warnings and status lines");
    box_opt("-h, --help", "Show this help");
    box_opt("-v, --version", "Show version");
    print_rule();
    box_line(&paint(BOLD, "Keypad", color));
    box_opt("1-9, 0", "Press slot 1-9, 0 is slot 10");
    box_opt("Backspace", "Remove the last key");
    box_opt("Delete, Ctrl+U", "Clear the entry");
    box_opt("Enter", "Submit");
    box_opt("Esc", "Cancel");
    box_bottom();
}

/// Status as plain lines, shared by the CLI and the menu.
pub fn status_lines(
    session: &Session,
    storage: StorageKind,
    latest: Option<&RegistrationRecord>,
) -> Vec<String> {
    let settings = session.settings();
    let mut lines = vec![
        format!("Experiment mode: {}", session.experiment_mode()),
        format!("Condition: {}", session.condition()),
        format!("Experiment generation: {}", settings.experiment_generation),
        format!(
            "Logged in: {}",
            if auth::is_logged_in(session) { "yes" } else { "no" }
        ),
        format!("Storage: {}", storage),
    ];

    match &settings.fixed_keypad {
        Some(fixed) => lines.push(format!(
            "Fixed keypad (gen {}): {}",
            fixed.generation,
            spaced(fixed.keys.symbols())
        )),
        None => lines.push("Fixed keypad: none".to_string()),
    }

    match latest {
        Some(record) => lines.push(format!(
            "Latest registration: {} ({}), {} passcode, {}",
            record.participant_id,
            record.username,
            record.password_type,
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => lines.push("Latest registration: none".to_string()),
    }
    lines
}

pub fn print_status(lines: &[String]) {
    box_top("Status");
    for line in lines {
        box_line(line);
    }
    box_bottom();
}

/// A ten-key pool prints as the keypad; the full vocabulary as rows.
pub fn print_pool(keys: &[Symbol]) {
    box_top(&format!("Keypad pool ({} symbols)", keys.len()));
    if keys.len() == KEYPAD_SIZE {
        box_keypad(keys);
    } else {
        for chunk in keys.chunks(12) {
            box_line_center(&spaced(chunk));
        }
    }
    box_bottom();
}

/// Redraw the whole keypad screen: header lines, grid, masked entry and meter.
pub fn print_keypad_screen(
    title: &str,
    lines: &[String],
    keys: &[Symbol],
    input: &InputBuffer,
    message: &str,
) {
    clear();
    box_top(title);
    for line in lines {
        box_line(line);
    }
    print_rule();
    box_keypad(keys);
    print_rule();
    box_line_center(&input.display());
    box_line_center(&input.meta());
    box_bottom();
    if message.is_empty() {
        println!("1-9/0 press a key, Backspace, Delete clears, Enter submits, Esc cancels");
    } else {
        println!("{RED}{message}{RESET}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Vocabulary;

    #[test]
    fn test_status_lines() {
        let mut session = Session::in_memory(Vocabulary::standard());
        let lines = status_lines(&session, StorageKind::Local, None);
        assert!(lines.contains(&"Logged in: no".to_string()));
        assert!(lines.contains(&"Storage: local".to_string()));
        assert!(lines.contains(&"Fixed keypad: none".to_string()));
        assert!(lines.contains(&"Latest registration: none".to_string()));

        session.set_logged_in(true);
        let lines = status_lines(&session, StorageKind::Memory, None);
        assert!(lines.contains(&"Logged in: yes".to_string()));
        assert!(lines.contains(&"Storage: memory".to_string()));
    }
}
