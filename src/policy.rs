//! Tiered disclosure policy: what each observability tier may reveal.
//!
//! The policy is deliberately monotonic. Each tier reveals a superset of the
//! distinguishing information of the tier below it, and none reveals raw
//! message text:
//!
//! | tier      | reveals                                             |
//! |-----------|-----------------------------------------------------|
//! | `info`    | description only (content ignored entirely)         |
//! | `error`   | normalized kind + code                              |
//! | `warning` | redacted `SQLSTATE[...]` line, or description       |
//! | `debug`   | the fully redacted message                          |
//!
//! Unrecognized tier strings fall back to `debug` for masking: an operator
//! who invents a tier gets the most detail the policy can safely give, never
//! an error from inside an error path.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::classify::SqlErrorKind;

// ============================================================================
// Tier Names
// ============================================================================

/// Canonical tier name constants.
///
/// These are the only strings [`MaskLevel::parse`] recognizes; anything else
/// resolves to [`MaskLevel::Debug`].
pub mod levels {
    /// Most detail: the fully redacted message.
    pub const DEBUG: &str = "debug";
    /// Least detail: a fixed phrase plus the condition description.
    pub const INFO: &str = "info";
    /// The redacted `SQLSTATE` line when one exists.
    pub const WARNING: &str = "warning";
    /// Normalized kind and code only.
    pub const ERROR: &str = "error";
}

/// Parsed observability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskLevel {
    /// `debug` — and the documented fallback for unrecognized strings.
    Debug,
    /// `info`.
    Info,
    /// `warning`.
    Warning,
    /// `error`.
    Error,
}

impl MaskLevel {
    /// Resolve a caller-supplied tier string.
    ///
    /// Exact lowercase matches only; every other string is `Debug`. The
    /// caller's original string is still carried verbatim into
    /// [`ErrorReport::level`].
    #[inline]
    pub fn parse(level: &str) -> Self {
        match level {
            levels::INFO => Self::Info,
            levels::WARNING => Self::Warning,
            levels::ERROR => Self::Error,
            _ => Self::Debug,
        }
    }

    /// Canonical name of this tier.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => levels::DEBUG,
            Self::Info => levels::INFO,
            Self::Warning => levels::WARNING,
            Self::Error => levels::ERROR,
        }
    }
}

impl fmt::Display for MaskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Structured Report
// ============================================================================

/// Structured record built by [`process`](crate::SqlErrorMasker::process),
/// ready to hand to any logging or emission backend.
///
/// Base fields are always present (`error_code` serializes as `null` when no
/// code was found). Tier-dependent fields are `None` — and omitted from
/// serialized output — unless the tier includes them: `debug` carries
/// `category`, `severity`, `full_masked_error`, and `context`; `warning`
/// carries `category` and `severity`; `error` carries `error_category`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// The caller's tier string, verbatim — even when unrecognized.
    pub level: String,
    /// Masked display string for this tier.
    pub message: String,
    /// Normalized kind name (`resource_exists`, ...).
    pub error_type: String,
    /// Extracted code, if any.
    pub error_code: Option<String>,
    /// RFC 3339 wall-clock time of the `process` call. Fresh per call, so
    /// tests assert shape, never value.
    pub timestamp: String,
    /// Category name; `debug` and `warning` tiers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Severity name; `debug` and `warning` tiers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// The full redactor output; `debug` tier only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_masked_error: Option<String>,
    /// Caller-supplied context map; `debug` tier only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    /// Category name under the flat `error`-tier key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<String>,
}

impl ErrorReport {
    /// Serialize to a JSON value.
    ///
    /// Infallible in practice: every field is a string, map, or option
    /// thereof.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ============================================================================
// User-Facing Sentences (Frozen)
// ============================================================================

/// The fixed sentence shown to end users for a classified kind.
///
/// Exactly six sentences exist, one per kind; `DatabaseError` doubles as the
/// fallback for anything the heuristics could not narrow. Sentences name no
/// table, value, or code.
#[inline]
pub const fn user_sentence(kind: SqlErrorKind) -> &'static str {
    match kind {
        SqlErrorKind::ResourceExists => "This record already exists in the system.",
        SqlErrorKind::ResourceNotFound => "The requested information could not be found.",
        SqlErrorKind::DuplicateData => "This information has already been recorded.",
        SqlErrorKind::QueryError => "There was a problem processing your request.",
        SqlErrorKind::ConnectionError => {
            "We are having trouble reaching the service. Please try again in a moment."
        }
        SqlErrorKind::DatabaseError => "An unexpected problem occurred. Please try again later.",
    }
}

/// All six user sentences, for exhaustiveness checks in tests.
pub const ALL_USER_SENTENCES: [&str; 6] = [
    user_sentence(SqlErrorKind::ResourceExists),
    user_sentence(SqlErrorKind::ResourceNotFound),
    user_sentence(SqlErrorKind::DuplicateData),
    user_sentence(SqlErrorKind::QueryError),
    user_sentence(SqlErrorKind::ConnectionError),
    user_sentence(SqlErrorKind::DatabaseError),
];

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognized_levels() {
        assert_eq!(MaskLevel::parse("debug"), MaskLevel::Debug);
        assert_eq!(MaskLevel::parse("info"), MaskLevel::Info);
        assert_eq!(MaskLevel::parse("warning"), MaskLevel::Warning);
        assert_eq!(MaskLevel::parse("error"), MaskLevel::Error);
    }

    #[test]
    fn unrecognized_levels_fall_back_to_debug() {
        assert_eq!(MaskLevel::parse("trace"), MaskLevel::Debug);
        assert_eq!(MaskLevel::parse("INFO"), MaskLevel::Debug);
        assert_eq!(MaskLevel::parse(""), MaskLevel::Debug);
    }

    #[test]
    fn level_round_trips_through_as_str() {
        for level in [
            MaskLevel::Debug,
            MaskLevel::Info,
            MaskLevel::Warning,
            MaskLevel::Error,
        ] {
            assert_eq!(MaskLevel::parse(level.as_str()), level);
        }
    }

    #[test]
    fn user_sentences_are_distinct_and_nonempty() {
        for (i, sentence) in ALL_USER_SENTENCES.iter().enumerate() {
            assert!(!sentence.is_empty());
            for other in &ALL_USER_SENTENCES[i + 1..] {
                assert_ne!(sentence, other);
            }
        }
    }

    #[test]
    fn report_serializes_tier_fields_conditionally() {
        let report = ErrorReport {
            level: "info".into(),
            message: "Database operation failed: Table already exists".into(),
            error_type: "resource_exists".into(),
            error_code: None,
            timestamp: "2024-01-01T00:00:00+00:00".into(),
            category: None,
            severity: None,
            full_masked_error: None,
            context: None,
            error_category: None,
        };

        let json = report.to_json();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("level"));
        assert!(object.contains_key("error_code")); // null, but present
        assert!(object["error_code"].is_null());
        assert!(!object.contains_key("category"));
        assert!(!object.contains_key("full_masked_error"));
    }
}
