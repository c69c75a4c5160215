//! Window-title redaction for privacy mode. Runs before titles are compared
//! or stored, so sensitive text never reaches the database.

use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_PLACEHOLDER: &str = "[EMAIL]";
pub const PHONE_PLACEHOLDER: &str = "[PHONE]";
pub const CARD_PLACEHOLDER: &str = "[CARD]";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.-]+@[\w.-]+\.\w+\b").unwrap());

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap());

static CARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b").unwrap());

/// Masks emails, then phone numbers, then card numbers, in that order.
pub fn redact_title(title: &str) -> String {
    let pass = EMAIL_RE.replace_all(title, EMAIL_PLACEHOLDER);
    let pass = PHONE_RE.replace_all(&pass, PHONE_PLACEHOLDER);
    CARD_RE.replace_all(&pass, CARD_PLACEHOLDER).into_owned()
}
