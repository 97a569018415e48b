//! Slug derivation for block names
//!
//! A slug is the lowercase, hyphen-separated key the host uses to identify a
//! block. Names are transliterated to ASCII first, so only `a-z`, `0-9` and
//! the separator survive.

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;

const SEPARATOR: char = '-';

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\-a-z0-9\s]+").expect("slug character class is valid"));

static SEPARATOR_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\-\s]+").expect("slug separator class is valid"));

/// Convert a display name into a slug
///
/// Non-ASCII letters are transliterated (`é` becomes `e`, `ß` becomes
/// `ss`). Underscores become separators and `@` is spelled out as `at`.
///
/// # Examples
/// ```
/// use block_composer::core::slug::slugify;
///
/// assert_eq!(slugify("Call To Action"), "call-to-action");
/// assert_eq!(slugify("  Hero__Banner! "), "hero-banner");
/// assert_eq!(slugify("Café Menü"), "cafe-menu");
/// ```
pub fn slugify(value: &str) -> String {
    let value = deunicode(value).replace('_', "-").replace('@', "-at-");
    let lowered = value.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let collapsed = SEPARATOR_RUNS.replace_all(&stripped, "-");

    collapsed.trim_matches(SEPARATOR).to_string()
}
