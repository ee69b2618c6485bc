//! Placeholder substitution for job-card layouts.
//!
//! Layout text refers to record values with `{{name}}` tokens. Substitution is
//! one regex scan over the input, so replacement values are never re-scanned
//! and the output does not depend on field iteration order.

mod record;

pub use record::{RecordData, RecordError};

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}]*)\}\}").expect("BUG: invalid PLACEHOLDER_RE regex literal")
});

/// Replaces every `{{name}}` token that `record` can answer. Unknown tokens
/// are left as written.
pub fn resolve<'a>(text: &'a str, record: &RecordData) -> Cow<'a, str> {
    if !text.contains("{{") {
        return Cow::Borrowed(text);
    }
    PLACEHOLDER_RE.replace_all(text, |caps: &Captures<'_>| match record.lookup(&caps[1]) {
        Some(value) => value.to_string(),
        None => {
            log::debug!("No value for placeholder '{}'", &caps[1]);
            caps[0].to_string()
        }
    })
}

/// Lists the token names referenced by `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}
