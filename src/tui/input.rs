use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, read};

use crate::terminal::{RawModeGuard, console_width, flush, reset_terminal};

/// Single-line editor with cursor movement. Returns `None` on Esc or Ctrl+Q.
///
/// Edits work on chars so identifiers with non-ASCII letters stay intact.
pub fn get_editable_input(prompt: &str, initial_value: &str) -> Option<String> {
    let mut input: Vec<char> = initial_value.chars().collect();
    let mut cursor_pos = input.len();
    let mut last_width = console_width(initial_value);
    let mut cancelled = false;

    // RawModeGuard ensures raw mode is disabled even if we panic or return early
    let mut guard = match RawModeGuard::new() {
        Ok(g) => g,
        Err(_) => return Some(initial_value.to_string()),
    };

    print!("{}: {}", prompt, initial_value);
    flush();

    loop {
        match read() {
            Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
                let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
                match key_event.code {
                    KeyCode::Char('c') if ctrl => {
                        // process::exit skips destructors, so restore the terminal first
                        reset_terminal();
                        println!();
                        std::process::exit(0);
                    }
                    KeyCode::Char('q') if ctrl => {
                        cancelled = true;
                        break;
                    }
                    KeyCode::Char('u') if ctrl => {
                        input.clear();
                        cursor_pos = 0;
                    }
                    KeyCode::Esc => {
                        cancelled = true;
                        break;
                    }
                    KeyCode::Enter => break,
                    KeyCode::Backspace if cursor_pos > 0 => {
                        cursor_pos -= 1;
                        input.remove(cursor_pos);
                    }
                    KeyCode::Delete if cursor_pos < input.len() => {
                        input.remove(cursor_pos);
                    }
                    KeyCode::Left if cursor_pos > 0 => cursor_pos -= 1,
                    KeyCode::Right if cursor_pos < input.len() => cursor_pos += 1,
                    KeyCode::Home => cursor_pos = 0,
                    KeyCode::End => cursor_pos = input.len(),
                    KeyCode::Char(c) if !ctrl => {
                        input.insert(cursor_pos, c);
                        cursor_pos += 1;
                    }
                    _ => {}
                }

                let text: String = input.iter().collect();
                let before: String = input[..cursor_pos].iter().collect();

                // Redraw the input line
                print!("\r{}: {}", prompt, " ".repeat(last_width + 1));
                print!("\r{}: {}", prompt, text);
                print!("\x1b[{}G", console_width(prompt) + 3 + console_width(&before));
                flush();
                last_width = console_width(&text);
            }
            Err(_) => break,
            _ => {}
        }
    }

    // Leave raw mode before println so the newline returns the carriage
    guard.release();
    println!();
    if cancelled {
        None
    } else {
        Some(input.into_iter().collect())
    }
}
