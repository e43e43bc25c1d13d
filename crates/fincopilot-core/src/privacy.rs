//! Masking for free-text fields that leave the process
//!
//! Transaction descriptions and merchant names often carry email addresses
//! or card and account numbers. [`sanitize_text`] scrubs those before the
//! text is rendered into a responder prompt.

use std::sync::OnceLock;

use regex::Regex;

/// Longest sanitized string, in characters
pub const MAX_TEXT_CHARS: usize = 60;
const TRUNCATED_CHARS: usize = MAX_TEXT_CHARS - 3;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
    })
}

fn long_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{10,}").expect("valid regex"))
}

/// Mask emails as `[EMAIL]`, runs of 10+ digits as `[NUM]`, and cut
/// anything longer than 60 characters to 57 plus `...`
pub fn sanitize_text(text: &str) -> String {
    let masked = email_re().replace_all(text, "[EMAIL]");
    let masked = long_number_re().replace_all(&masked, "[NUM]");

    if masked.chars().count() > MAX_TEXT_CHARS {
        let mut cut: String = masked.chars().take(TRUNCATED_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        masked.into_owned()
    }
}
