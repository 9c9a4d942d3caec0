//! Terminal output utilities.
//!
//! Box drawing, keypad grids, ANSI helpers.

use crossterm::terminal::disable_raw_mode;
use std::io::{self, Write};

use crate::auth::input::slot_label;
use crate::cli::quiet;
use crate::pin::Symbol;

// ============================================================================
// ANSI Color/Style Constants
// ============================================================================

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[90m";
pub const RED: &str = "\x1b[38;5;9m";
pub const GREEN: &str = "\x1b[38;5;10m";

// ============================================================================
// Terminal Control
// ============================================================================

/// Clear screen and move cursor to top-left.
pub fn clear() {
    print!("\x1b[2J\x1b[3J\x1b[H");
    flush();
}

/// Flush stdout.
pub fn flush() {
    let _ = io::stdout().flush();
}

/// Reset terminal to sane state (fixes staggered text issues).
pub fn reset_terminal() {
    let _ = disable_raw_mode();
    print!("\x1b[0m");
    flush();
}

// ============================================================================
// Styled Output Helpers
// ============================================================================

/// `text` wrapped in `code` and a reset, or bare when `color` is off.
pub fn paint(code: &str, text: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Print error message in red.
pub fn print_error(msg: &str) {
    println!("{}", paint(RED, msg, quiet::is_stdout_tty()));
}

pub fn print_success(msg: &str) {
    println!("{}", paint(GREEN, msg, quiet::is_stdout_tty()));
}

/// Print a horizontal rule (box style).
pub fn print_rule() {
    println!("├{}┤", "─".repeat(BOX_WIDTH - 2));
}

// ============================================================================
// Box Drawing (58 char width)
// ============================================================================

pub const BOX_WIDTH: usize = 58;

/// Print box top with optional title: ┌─ Title ───────────────────────────┐
pub fn box_top(title: &str) {
    if title.is_empty() {
        println!("┌{}┐", "─".repeat(BOX_WIDTH - 2));
    } else {
        let title_part = format!("─ {} ", title);
        let remaining = (BOX_WIDTH - 2).saturating_sub(console_width(&title_part));
        println!("┌{}{}┐", title_part, "─".repeat(remaining));
    }
}

/// Print box content line: │ content                                        │
pub fn box_line(content: &str) {
    let inner_width = BOX_WIDTH - 4;
    let padding = inner_width.saturating_sub(console_width(content));
    println!("│ {}{} │", content, " ".repeat(padding));
}

/// Print centered box content line: │          content          │
pub fn box_line_center(content: &str) {
    let inner_width = BOX_WIDTH - 4;
    let total_padding = inner_width.saturating_sub(console_width(content));
    let left_pad = total_padding / 2;
    let right_pad = total_padding - left_pad;
    println!(
        "│ {}{}{} │",
        " ".repeat(left_pad),
        content,
        " ".repeat(right_pad)
    );
}

/// Print box bottom: └───────────────────────────────────────────────────────┘
pub fn box_bottom() {
    println!("└{}┘", "─".repeat(BOX_WIDTH - 2));
}

/// Print a help option with flag and description, auto-wrapping if needed.
pub fn box_opt(flag: &str, desc: &str) {
    let inner_width = BOX_WIDTH - 4;
    let flag_col = 22;
    let desc_col = inner_width - flag_col;

    let flag_padded = format!("{:<width$}", flag, width = flag_col);

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();
    for word in desc.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= desc_col {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }

    let first = lines.first().map(String::as_str).unwrap_or("");
    let padding = desc_col.saturating_sub(first.len());
    println!("│ {}{}{} │", flag_padded, first, " ".repeat(padding));

    let indent = " ".repeat(flag_col);
    for line in lines.iter().skip(1) {
        let padding = desc_col.saturating_sub(line.len());
        println!("│ {}{}{} │", indent, line, " ".repeat(padding));
    }
}

// ============================================================================
// Width
// ============================================================================

/// Columns a character occupies: zero for joiners, variation selectors and
/// combining marks, two for emoji and East Asian wide ranges.
fn char_width(c: char) -> usize {
    match c as u32 {
        0x200B..=0x200F | 0xFE00..=0xFE0F | 0x0300..=0x036F | 0x20D0..=0x20FF => 0,
        0x1F3FB..=0x1F3FF | 0xE0020..=0xE007F => 0,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0x2600..=0x27BF
        | 0x2B50..=0x2B55
        | 0x1F300..=0x1FAFF => 2,
        _ => 1,
    }
}

/// Display width of `s`, skipping ANSI escapes and counting wide glyphs as two.
pub fn console_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else {
            width += char_width(c);
        }
    }
    width
}

// ============================================================================
// Keypad Grid
// ============================================================================

/// Lay out keys phone-style: three rows of three, then the tenth key centred.
/// Each cell shows the slot key that selects it, dimmed when `color` is on.
pub fn keypad_rows(keys: &[Symbol], color: bool) -> Vec<String> {
    let cell = |i: usize| -> String {
        match keys.get(i) {
            Some(symbol) => {
                let pad = 3usize.saturating_sub(console_width(symbol.as_str()));
                let label = paint(DIM, &format!("[{}]", slot_label(i)), color);
                format!("{} {}{}", label, symbol, " ".repeat(pad))
            }
            None => " ".repeat(8),
        }
    };

    let mut rows: Vec<String> = (0..3)
        .map(|r| {
            (0..3)
                .map(|c| cell(r * 3 + c))
                .collect::<Vec<_>>()
                .join("   ")
        })
        .collect();
    if keys.len() > 9 {
        rows.push(cell(9));
    }
    rows
}

/// Print the keypad grid inside the current box.
pub fn box_keypad(keys: &[Symbol]) {
    for row in keypad_rows(keys, true) {
        box_line_center(&row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Keypad;

    #[test]
    fn test_console_width() {
        assert_eq!(console_width("abc"), 3);
        assert_eq!(console_width("\x1b[31mabc\x1b[0m"), 3);
        assert_eq!(console_width("🔥"), 2);
        assert_eq!(console_width("⭐"), 2);
        assert_eq!(console_width("❤️"), 2);
        assert_eq!(console_width("●●--"), 4);
    }

    #[test]
    fn test_keypad_rows_layout() {
        let rows = keypad_rows(Keypad::digits().symbols(), true);
        assert_eq!(rows.len(), 4);
        assert!(rows[0].contains("[1]") && rows[0].contains("[3]"));
        assert!(rows[3].contains("[0]"));
        assert_eq!(console_width(&rows[0]), console_width(&rows[2]));
    }

    #[test]
    fn test_plain_keypad_rows_have_no_escapes() {
        let plain = keypad_rows(Keypad::digits().symbols(), false);
        let colored = keypad_rows(Keypad::digits().symbols(), true);
        assert!(plain.iter().all(|row| !row.contains('\x1b')));
        assert!(colored[0].starts_with(DIM));
        assert_eq!(plain[0], "[1] 1     [2] 2     [3] 3  ");
        for (p, c) in plain.iter().zip(&colored) {
            assert_eq!(console_width(p), console_width(c));
        }
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint(RED, "x", false), "x");
        assert_eq!(paint(RED, "x", true), format!("{RED}x{RESET}"));
    }
}
