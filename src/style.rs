//! ANSI styling for transcript lines.
//!
//! The shell emits pre-colorized lines; the embedding host only has to
//! translate escape codes into its own rendering (HTML, terminal, ...).

use std::fmt::{self, Display};

/// ANSI reset sequence.
pub const RESET: &str = "\u{1B}[0m";

/// Prompt name a fresh shell starts with.
pub const DEFAULT_NAME: &str = "\u{25B2}";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
}

impl Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{1B}[{}m", *self as u8)
    }
}

/// Wrap `text` in a color.
pub fn paint(color: ColorCode, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// Wrap `text` in a bold color.
pub fn paint_bold(color: ColorCode, text: &str) -> String {
    format!("\u{1B}[1;{}m{text}{RESET}", color as u8)
}

/// The styled `err` tag every user-facing error line starts with.
pub fn error_line(msg: &str) -> String {
    format!("{} {msg}", paint_bold(ColorCode::Red, "err"))
}

/// The styled `success` tag.
pub fn success_line(msg: &str) -> String {
    format!("{} {msg}", paint_bold(ColorCode::Green, "success"))
}

/// The prompt segment rendered before the input line: `name ~` in bold red,
/// then a plain `$`.
pub fn prompt_line(name: &str) -> String {
    format!("{} $", paint_bold(ColorCode::Red, &format!("{name} ~")))
}

/// Remove ANSI color sequences. Used by hosts that need plain text widths
/// and by tests asserting on line content.
pub fn strip_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1B}' {
            // skip to the terminating `m` of a CSI color sequence
            for e in chars.by_ref() {
                if e == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_wraps_and_resets() {
        assert_eq!(paint(ColorCode::Blue, "ls"), "\u{1B}[34mls\u{1B}[0m");
        assert_eq!(paint_bold(ColorCode::Red, "err"), "\u{1B}[1;31merr\u{1B}[0m");
    }

    #[test]
    fn strip_codes_removes_styling() {
        let line = error_line("unknown command frobnicate");
        assert_eq!(strip_codes(&line), "err unknown command frobnicate");
        assert_eq!(strip_codes("plain"), "plain");
    }

    #[test]
    fn prompt_contains_name_and_dollar() {
        assert_eq!(strip_codes(&prompt_line("▲")), "▲ ~ $");
    }
}
