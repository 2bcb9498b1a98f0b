//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! text rules so every mutation path trims and normalizes the same way.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim and NFC-normalize a name that must not be empty.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(normalized)
}

/// Trim optional free text, mapping blank input to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed_and_composed() {
        // "e" + combining acute accent composes to a single code point.
        let name = normalize_required_name("  Rene\u{301}e ", "participant").unwrap();
        assert_eq!(name, "Ren\u{e9}e");
        assert_eq!(name.chars().count(), 5);
    }

    #[test]
    fn blank_required_name_is_rejected() {
        assert_eq!(
            normalize_required_name("   ", "item"),
            Err(EngineError::InvalidName(
                "item name must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" a@b.lk ")),
            Some("a@b.lk".to_string())
        );
    }
}
