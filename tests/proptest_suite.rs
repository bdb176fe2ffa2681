//! Property-based tests for sqlveil
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use proptest::prelude::*;
use sqlveil::{levels, SqlErrorMasker, ALL_USER_SENTENCES};

// ============================================================================
// TOTALITY PROPERTIES
// ============================================================================

proptest! {
    /// The engine is called from error paths and must never panic,
    /// whatever the message or tier string.
    #[test]
    fn engine_never_panics(
        message in "\\PC*",
        level in "\\PC{0,20}",
    ) {
        let masker = SqlErrorMasker::default();
        let _ = masker.identify(&message);
        let _ = masker.extract_code(Some(&message));
        let _ = masker.redact(&message);
        let _ = masker.mask(&message, &level);
        let _ = masker.process(&message, &level);
        let _ = masker.user_message(&message);
    }

    /// Masked output is always valid UTF-8 at every tier.
    #[test]
    fn mask_output_is_utf8(message in "\\PC*") {
        let masker = SqlErrorMasker::default();
        for level in ["debug", "info", "warning", "error"] {
            let masked = masker.mask(&message, level);
            prop_assert!(std::str::from_utf8(masked.as_bytes()).is_ok());
        }
    }
}

// ============================================================================
// LEAK PROPERTIES
// ============================================================================

proptest! {
    /// Backtick-quoted identifiers never survive redaction.
    #[test]
    fn backtick_identifiers_never_survive(ident in "[a-z_]{3,20}") {
        let masker = SqlErrorMasker::default();
        let message = format!("Table `{ident}` already exists");
        let masked = masker.mask(&message, levels::DEBUG);

        prop_assert!(!masked.contains('`'));
        prop_assert!(masked.contains("[REDACTED]"));
    }

    /// Single-quoted literals never survive redaction.
    #[test]
    fn quoted_literals_never_survive(value in "[a-zA-Z0-9@.]{3,20}") {
        let masker = SqlErrorMasker::default();
        let message = format!("Duplicate entry '{value}' for key 'uniq'");
        let masked = masker.mask(&message, levels::DEBUG);

        let needle = format!("'{value}'");
        prop_assert!(!masked.contains(&needle));
    }

    /// The info tier ignores message content entirely: whatever the input,
    /// the output is the fixed prefix plus a table description.
    #[test]
    fn info_tier_ignores_content(message in "\\PC*") {
        let masker = SqlErrorMasker::default();
        let masked = masker.mask(&message, levels::INFO);
        prop_assert!(masked.starts_with("Database operation failed: "));
    }
}

// ============================================================================
// REDACTION PROPERTIES
// ============================================================================

proptest! {
    /// Redacting an already-redacted message is a no-op: placeholder tokens
    /// never re-match their own source patterns.
    #[test]
    fn redaction_is_idempotent(message in "\\PC*") {
        let masker = SqlErrorMasker::default();
        let once = masker.redact(&message);
        let twice = masker.redact(&once);
        prop_assert_eq!(once, twice);
    }

    /// Redaction never grows unboundedly: output length is within a small
    /// constant factor of input length (placeholders are short).
    #[test]
    fn redaction_is_bounded(message in "\\PC{0,2000}") {
        let masker = SqlErrorMasker::default();
        let masked = masker.redact(&message);
        prop_assert!(masked.len() <= message.len() * 16 + 64);
    }
}

// ============================================================================
// REPORT PROPERTIES
// ============================================================================

proptest! {
    /// The caller's tier string travels verbatim into the report, and a
    /// parseable timestamp is always present.
    #[test]
    fn report_level_passthrough(
        message in "\\PC{0,500}",
        level in "\\PC{0,20}",
    ) {
        let masker = SqlErrorMasker::default();
        let report = masker.process(&message, &level);

        prop_assert_eq!(report.level, level);
        prop_assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        prop_assert!(!report.error_type.is_empty());
    }

    /// Reports serialize to JSON objects with the base keys at every tier.
    #[test]
    fn report_serializes_with_base_keys(
        message in "\\PC{0,500}",
        level in prop::sample::select(vec!["debug", "info", "warning", "error"]),
    ) {
        let masker = SqlErrorMasker::default();
        let json = masker.process(&message, level).to_json();
        let object = json.as_object().expect("report must serialize to an object");

        for key in ["level", "message", "error_type", "error_code", "timestamp"] {
            prop_assert!(object.contains_key(key), "missing {}", key);
        }
    }
}

// ============================================================================
// USER MESSAGE PROPERTIES
// ============================================================================

proptest! {
    /// Whatever the input, the user sentence is one of the six canned ones.
    #[test]
    fn user_message_is_always_canned(message in "\\PC*") {
        let masker = SqlErrorMasker::default();
        let sentence = masker.user_message(&message);
        prop_assert!(ALL_USER_SENTENCES.contains(&sentence));
    }
}

// ============================================================================
// CONCURRENT PROPERTIES
// ============================================================================

proptest! {
    /// One shared engine serves concurrent callers without coordination.
    #[test]
    fn concurrent_masking(
        thread_count in 1usize..4,
        messages_per_thread in 1usize..20,
    ) {
        let masker = std::sync::Arc::new(SqlErrorMasker::default());

        let handles: Vec<_> = (0..thread_count)
            .map(|t| {
                let masker = std::sync::Arc::clone(&masker);
                std::thread::spawn(move || {
                    for i in 0..messages_per_thread {
                        let message = format!("SQLSTATE[23505]: worker {t} item {i}");
                        let _ = masker.mask(&message, levels::WARNING);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
