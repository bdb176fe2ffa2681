//! Heuristic classification of raw driver messages into a normalized tuple.
//!
//! Classification never parses SQL. It combines two cheap signals over a
//! bounded, case-folded scan window:
//!
//! - the extracted code, which selects a description from the frozen table
//!   in [`crate::codes`], and
//! - an ordered keyword rule chain over the message body, which selects
//!   kind, category, and severity together.
//!
//! # Rule Discipline
//!
//! The keyword chain is an explicit ordered sequence of `(needles, verdict)`
//! records, evaluated top to bottom, first match wins. All three verdict
//! fields are assigned by the same rule, so no partially-classified state is
//! ever observable. No match leaves the defaults
//! (`database_error` / `general` / `medium`) untouched.

use std::fmt;

use serde::Serialize;

use crate::codes;

// ============================================================================
// Normalized Enums
// ============================================================================

/// Normalized kind of a database error.
///
/// Wire and report names are snake_case (`resource_exists`, ...); use
/// [`SqlErrorKind::as_str`] or `Display` to obtain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlErrorKind {
    /// A schema object being created already exists.
    ResourceExists,
    /// A referenced schema object does not exist.
    ResourceNotFound,
    /// A row collided with an existing unique value.
    DuplicateData,
    /// The statement was malformed or disallowed.
    QueryError,
    /// The server link failed or dropped.
    ConnectionError,
    /// Anything the heuristics could not narrow further (default).
    DatabaseError,
}

impl SqlErrorKind {
    /// snake_case name as used in reports and the `error` masking tier.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceExists => "resource_exists",
            Self::ResourceNotFound => "resource_not_found",
            Self::DuplicateData => "duplicate_data",
            Self::QueryError => "query_error",
            Self::ConnectionError => "connection_error",
            Self::DatabaseError => "database_error",
        }
    }
}

impl fmt::Display for SqlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad domain the error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// DDL-level structure: tables, views, columns.
    Schema,
    /// Row contents and integrity.
    Data,
    /// Statement shape and permissions.
    Query,
    /// Transport to the server.
    Connection,
    /// Unclassified (default).
    General,
}

impl ErrorCategory {
    /// snake_case name as used in reports.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Data => "data",
            Self::Query => "query",
            Self::Connection => "connection",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational severity of the classified error.
///
/// Ordered `Low < Medium < High < Critical` so alerting thresholds can be
/// expressed as comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Expected during normal operation (e.g. idempotent DDL replays).
    Low,
    /// Worth recording, not worth waking anyone (default).
    Medium,
    /// A request failed in a way the caller cannot retry blindly.
    High,
    /// Service-level impact; the database is unreachable or dropping work.
    Critical,
}

impl Severity {
    /// snake_case name as used in reports.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// True when this severity meets or exceeds `threshold`.
    #[inline]
    pub fn at_least(self, threshold: Severity) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Classified Value Type
// ============================================================================

/// Result of classifying one raw message. Stack-local, short-lived per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Normalized kind, `DatabaseError` when no keyword rule matched.
    pub kind: SqlErrorKind,
    /// First SQLSTATE or 4-digit vendor code found, if any.
    pub code: Option<String>,
    /// Short human-readable condition name, safe at every tier.
    pub description: String,
    /// Broad domain, `General` when no keyword rule matched.
    pub category: ErrorCategory,
    /// Operational severity, `Medium` when no keyword rule matched.
    pub severity: Severity,
}

impl Default for ErrorInfo {
    fn default() -> Self {
        Self {
            kind: SqlErrorKind::DatabaseError,
            code: None,
            description: codes::GENERIC_DESCRIPTION.to_string(),
            category: ErrorCategory::General,
            severity: Severity::Medium,
        }
    }
}

// ============================================================================
// Keyword Rule Chain (Frozen, Ordered)
// ============================================================================

struct KeywordRule {
    needles: &'static [&'static str],
    kind: SqlErrorKind,
    category: ErrorCategory,
    severity: Severity,
}

/// Evaluated top to bottom against the case-folded scan window; first match
/// wins. Order is part of the contract: "duplicate ... already exists" must
/// classify as `ResourceExists`, not `DuplicateData`.
const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        needles: &["already exists"],
        kind: SqlErrorKind::ResourceExists,
        category: ErrorCategory::Schema,
        severity: Severity::Low,
    },
    KeywordRule {
        needles: &["not found", "unknown table"],
        kind: SqlErrorKind::ResourceNotFound,
        category: ErrorCategory::Schema,
        severity: Severity::High,
    },
    KeywordRule {
        needles: &["duplicate"],
        kind: SqlErrorKind::DuplicateData,
        category: ErrorCategory::Data,
        severity: Severity::Medium,
    },
    KeywordRule {
        needles: &["syntax error"],
        kind: SqlErrorKind::QueryError,
        category: ErrorCategory::Query,
        severity: Severity::High,
    },
    KeywordRule {
        needles: &["connection"],
        kind: SqlErrorKind::ConnectionError,
        category: ErrorCategory::Connection,
        severity: Severity::Critical,
    },
];

/// Classify an already-truncated, case-folded scan window.
///
/// `code` is consumed into the returned [`ErrorInfo`]; the description comes
/// from the code table when the code is known, else the generic default.
pub(crate) fn classify(scan: &str, code: Option<String>) -> ErrorInfo {
    let description = code
        .as_deref()
        .and_then(codes::describe)
        .unwrap_or(codes::GENERIC_DESCRIPTION)
        .to_string();

    let mut info = ErrorInfo {
        code,
        description,
        ..ErrorInfo::default()
    };

    for rule in KEYWORD_RULES {
        if rule.needles.iter().any(|needle| scan.contains(needle)) {
            info.kind = rule.kind;
            info.category = rule.category;
            info.severity = rule.severity;
            break;
        }
    }

    info
}

// ============================================================================
// Tests
// ============================================================================
