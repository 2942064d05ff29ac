use std::io::{self, IsTerminal, Write};
use nu_ansi_term::Color;
use crate::BrainfuckError;

/// Pretty-print a [`BrainfuckError`] with caret positioning.
/// If `program` is `Some("bf")`, prefix messages with "bf: ...".
pub fn print_error(program: Option<&str>, code: &[u8], err: &BrainfuckError) {
    let label = format!("error[{}]", err.kind());
    let label = if io::stderr().is_terminal() {
        Color::Red.bold().paint(label).to_string()
    } else {
        label
    };

    let msg = match program {
        Some(p) => format!("{p}: {label}: {err}"),
        None => format!("{label}: {err}"),
    };

    match err.ip() {
        Some(ip) => print_error_with_context(&msg, code, ip),
        None => eprintln!("{msg}"),
    }
    let _ = io::stderr().flush();
}

/// Print `message` followed by a short window of the program and a caret
/// under byte offset `pos`.
pub fn print_error_with_context(message: &str, code: &[u8], pos: usize) {
    eprintln!("{message}");
    if code.is_empty() {
        return;
    }
    eprintln!("  {}", context_window(code, pos));
    let _ = io::stderr().flush();
}

/// Render the context window and caret line as two lines of text.
///
/// Each byte maps to exactly one column so the caret lines up: whitespace
/// becomes a space and anything non-printable becomes `.`.
pub fn context_window(code: &[u8], pos: usize) -> String {
    // Show a short window around the position for context
    const WINDOW: usize = 32;

    let pos = pos.min(code.len().saturating_sub(1));
    let start = pos.saturating_sub(WINDOW);
    let end = (pos + WINDOW + 1).min(code.len());

    let slice: String = code[start..end]
        .iter()
        .map(|&b| match b {
            b if b.is_ascii_whitespace() => ' ',
            b if b.is_ascii_graphic() => b as char,
            _ => '.',
        })
        .collect();

    format!("{}\n  {}^", slice.trim_end(), " ".repeat(pos - start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_offset() {
        let window = context_window(b"++\n+]", 4);
        assert_eq!(window, "++ +]\n      ^");
    }

    #[test]
    fn window_is_clipped_around_long_programs() {
        let code = "+".repeat(100) + "]" + &"-".repeat(100);
        let window = context_window(code.as_bytes(), 100);
        let mut lines = window.lines();
        let source_line = lines.next().unwrap();
        let caret_line = lines.next().unwrap();
        assert_eq!(source_line.len(), 65);
        assert_eq!(source_line.as_bytes()[32], b']');
        assert_eq!(caret_line.find('^'), Some(2 + 32));
    }
}
