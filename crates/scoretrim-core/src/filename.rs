use std::sync::LazyLock;

use regex::Regex;

/// Base name used when the title sanitizes to nothing.
pub const DEFAULT_BASE_NAME: &str = "trimmed-score";

/// Suffix appended to every derived filename.
pub const FILENAME_SUFFIX: &str = "-trimmed.pdf";

static ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("valid filename regex"));

/// Derive a download filename from a user-supplied title.
///
/// Characters illegal in filenames become `_`, leading and trailing dots
/// and spaces are dropped, and an empty result falls back to
/// [`DEFAULT_BASE_NAME`].
pub fn derive_filename(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return format!("{DEFAULT_BASE_NAME}{FILENAME_SUFFIX}");
    }

    let sanitized = ILLEGAL_CHARS.replace_all(title, "_");
    let sanitized = sanitized.trim_matches(|c| c == '.' || c == ' ');
    let base = if sanitized.is_empty() {
        DEFAULT_BASE_NAME
    } else {
        sanitized
    };
    format!("{base}{FILENAME_SUFFIX}")
}
