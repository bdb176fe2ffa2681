//! # sqlveil
//!
//! Security-conscious classification and masking of SQL database error
//! messages.
//!
//! ## Design Philosophy
//!
//! 1. **Raw driver text is radioactive** — it carries table names, literal
//!    values, server identity, and filesystem paths
//! 2. **Classification is cheap and total** — every message maps to a
//!    normalized kind/category/severity, never to a secondary failure
//! 3. **Disclosure is tiered** — each observability tier reveals a strict
//!    superset of the tier below, and no tier reveals unredacted text
//! 4. **The engine must not throw** — it is called from error paths, where a
//!    secondary failure is worse than the original one
//! 5. **Rule tables are frozen** — compiled once, immutable, safe for
//!    unrestricted concurrent reads
//!
//! ## Threat Model
//!
//! We assume log aggregators, support tooling, and end-user screens are all
//! less trusted than the database itself. A raw `PDOException` message shown
//! to any of them can leak:
//!
//! - Schema details (table and column names, naming conventions)
//! - Data values (quoted literals, dates, account numbers, UUIDs)
//! - Infrastructure identity (database/connection names, file paths)
//!
//! Masking is heuristic, not a grammar: the rule set removes what it
//! recognizes and preserves message structure. It is a containment layer,
//! not a formal guarantee.
//!
//! ## Quick Start
//!
//! ```rust
//! use sqlveil::{levels, SqlErrorMasker};
//!
//! let masker = SqlErrorMasker::default();
//! let raw = "SQLSTATE[42S01]: Base table or view already exists: \
//!            1050 Table `trx_payments` already exists";
//!
//! // Safe for an end user:
//! assert_eq!(
//!     masker.user_message(raw),
//!     "This record already exists in the system."
//! );
//!
//! // Safe for an info-level log line:
//! let line = masker.mask(raw, levels::INFO);
//! assert!(line.starts_with("Database operation failed:"));
//! assert!(!line.contains("trx_payments"));
//!
//! // Most detail, still scrubbed:
//! let line = masker.mask(raw, levels::DEBUG);
//! assert!(!line.contains("trx_payments"));
//! assert!(line.contains("[REDACTED]"));
//! ```
//!
//! Callers that do not want to hold an engine can use the free functions in
//! [`convenience`], which share one process-wide engine with default
//! options.

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};
use zeroize::Zeroize;

pub mod classify;
pub mod codes;
pub mod convenience;
pub mod policy;
pub mod redact;

pub use classify::{ErrorCategory, ErrorInfo, Severity, SqlErrorKind};
pub use codes::{describe, known_codes, CodeList, GENERIC_DESCRIPTION};
pub use convenience::*;
pub use policy::{levels, user_sentence, ErrorReport, MaskLevel, ALL_USER_SENTENCES};
pub use redact::{Redactor, DEFAULT_TABLE_PATTERNS};

use codes::CodeExtractor;

/// Default scan-window size in bytes for code extraction and keyword
/// classification. Redaction is never truncated.
pub const DEFAULT_MAX_SCAN_LEN: usize = 8000;

// ============================================================================
// Construction-Time Options
// ============================================================================

/// Construction-time configuration for [`SqlErrorMasker`].
#[derive(Debug, Clone)]
pub struct MaskerOptions {
    /// Maximum number of bytes of the message considered for code and
    /// keyword extraction. Redaction ignores this limit and always processes
    /// the full input.
    pub max_scan_len: usize,
    /// Table-name convention patterns for the redactor; see
    /// [`Redactor::with_table_patterns`].
    pub table_name_patterns: Vec<String>,
}

impl Default for MaskerOptions {
    fn default() -> Self {
        Self {
            max_scan_len: DEFAULT_MAX_SCAN_LEN,
            table_name_patterns: DEFAULT_TABLE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

// ============================================================================
// The Engine
// ============================================================================

/// The classification-and-masking engine.
///
/// All rule tables are compiled at construction and never mutated, so one
/// engine can be shared freely across threads. Every method is a pure
/// function of its input (plus one clock read in [`process`]); none of them
/// returns `Err` or panics on message content.
///
/// [`process`]: SqlErrorMasker::process
pub struct SqlErrorMasker {
    options: MaskerOptions,
    extractor: CodeExtractor,
    redactor: Redactor,
    sqlstate_line: Regex,
}

impl SqlErrorMasker {
    /// Build an engine from options.
    ///
    /// # Panics
    ///
    /// Panics if a configured table-name pattern does not compile; see
    /// [`Redactor::with_table_patterns`].
    pub fn new(options: MaskerOptions) -> Self {
        let redactor = Redactor::with_table_patterns(&options.table_name_patterns);
        Self {
            options,
            extractor: CodeExtractor::new(),
            redactor,
            sqlstate_line: Regex::new(r"(?i)sqlstate\[[0-9a-z]+\]:[^\r\n]*")
                .expect("SQLSTATE line pattern must compile"),
        }
    }

    /// The options this engine was built with.
    #[inline]
    pub fn options(&self) -> &MaskerOptions {
        &self.options
    }

    /// Lower-cased scan window, bounded by `max_scan_len`.
    ///
    /// The window holds raw message text, so callers wipe it after use.
    fn scan_window(&self, message: &str) -> String {
        codes::truncate_to_boundary(message, self.options.max_scan_len).to_ascii_lowercase()
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    /// Classify a raw message into the normalized
    /// `{kind, code, description, category, severity}` tuple.
    pub fn identify(&self, message: &str) -> ErrorInfo {
        let mut scan = self.scan_window(message);
        let code = self.extractor.find(&scan);
        let info = classify::classify(&scan, code);
        scan.zeroize();
        info
    }

    /// Extract the SQLSTATE or 4-digit vendor code, if any.
    ///
    /// `None` input yields `None`; this never raises, by design — it is
    /// meant to be callable straight from an exception handler.
    pub fn extract_code(&self, message: Option<&str>) -> Option<String> {
        let message = message?;
        let mut scan = self.scan_window(message);
        let code = self.extractor.find(&scan);
        scan.zeroize();
        code
    }

    /// True when the classified kind equals `kind`, ignoring ASCII case.
    ///
    /// A convenience re-run of [`identify`](Self::identify), not a cached
    /// lookup.
    pub fn is_type(&self, kind: &str, message: &str) -> bool {
        self.identify(message).kind.as_str().eq_ignore_ascii_case(kind)
    }

    /// True when the extracted code matches `codes` (one code or a list),
    /// ignoring ASCII case.
    pub fn has_code<C: CodeList>(&self, codes: C, message: &str) -> bool {
        match self.extract_code(Some(message)) {
            Some(found) => codes.matches_code(&found),
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------------

    /// True for create-collision errors, by keyword kind or known code.
    pub fn is_resource_exists(&self, message: &str) -> bool {
        self.kind_or_code(
            message,
            SqlErrorKind::ResourceExists,
            known_codes::RESOURCE_EXISTS,
        )
    }

    /// True for missing-object errors, by keyword kind or known code.
    pub fn is_resource_not_found(&self, message: &str) -> bool {
        self.kind_or_code(
            message,
            SqlErrorKind::ResourceNotFound,
            known_codes::RESOURCE_NOT_FOUND,
        )
    }

    /// True for unique-value collisions, by keyword kind or known code.
    pub fn is_duplicate_data(&self, message: &str) -> bool {
        self.kind_or_code(
            message,
            SqlErrorKind::DuplicateData,
            known_codes::DUPLICATE_DATA,
        )
    }

    /// True for malformed-statement errors, by keyword kind or known code.
    pub fn is_query_error(&self, message: &str) -> bool {
        self.kind_or_code(message, SqlErrorKind::QueryError, known_codes::QUERY_ERROR)
    }

    /// True for server-link failures, by keyword kind or known code.
    pub fn is_connection_error(&self, message: &str) -> bool {
        self.kind_or_code(
            message,
            SqlErrorKind::ConnectionError,
            known_codes::CONNECTION_ERROR,
        )
    }

    /// True for integrity-constraint violations.
    ///
    /// Defined purely by code membership in
    /// [`known_codes::CONSTRAINT_VIOLATION`]; there is no keyword component.
    pub fn is_constraint_violation(&self, message: &str) -> bool {
        self.extract_code(Some(message))
            .is_some_and(|code| codes::code_in(&code, known_codes::CONSTRAINT_VIOLATION))
    }

    fn kind_or_code(&self, message: &str, kind: SqlErrorKind, set: &[&str]) -> bool {
        let info = self.identify(message);
        info.kind == kind
            || info
                .code
                .as_deref()
                .is_some_and(|code| codes::code_in(code, set))
    }

    // ------------------------------------------------------------------------
    // Masking Policy
    // ------------------------------------------------------------------------

    /// Redact the full, untruncated message.
    pub fn redact(&self, message: &str) -> String {
        self.redactor.redact(message)
    }

    /// Produce the display string for an observability tier.
    ///
    /// `level` is one of the [`levels`] constants; any other string gets the
    /// `debug` policy (most detail, still scrubbed).
    pub fn mask(&self, message: &str, level: &str) -> String {
        let info = self.identify(message);
        self.mask_classified(message, MaskLevel::parse(level), &info)
    }

    fn mask_classified(&self, message: &str, level: MaskLevel, info: &ErrorInfo) -> String {
        match level {
            // Content is ignored entirely: only the (table-sourced or
            // generic) description surfaces.
            MaskLevel::Info => format!("Database operation failed: {}", info.description),
            MaskLevel::Warning => {
                let redacted = self.redactor.redact(message);
                match self.sqlstate_line.find(&redacted) {
                    Some(found) => found.as_str().to_string(),
                    None => format!("Database warning: {}", info.description),
                }
            }
            MaskLevel::Error => format!(
                "Database error occurred - {} ({})",
                info.kind,
                info.code.as_deref().unwrap_or("UNKNOWN")
            ),
            MaskLevel::Debug => self.redactor.redact(message),
        }
    }

    /// Build a structured [`ErrorReport`] with an empty context map.
    pub fn process(&self, message: &str, level: &str) -> ErrorReport {
        self.process_with_context(message, level, Map::new())
    }

    /// Build a structured [`ErrorReport`] for a tier, carrying
    /// caller-supplied context into `debug`-tier reports.
    ///
    /// The caller's `level` string travels verbatim into the report even
    /// when unrecognized; the masking policy applied is the parsed tier.
    pub fn process_with_context(
        &self,
        message: &str,
        level: &str,
        context: Map<String, Value>,
    ) -> ErrorReport {
        let info = self.identify(message);
        let tier = MaskLevel::parse(level);
        let masked = self.mask_classified(message, tier, &info);

        tracing::trace!(
            kind = info.kind.as_str(),
            code = info.code.as_deref().unwrap_or("UNKNOWN"),
            tier = tier.as_str(),
            "classified database error"
        );

        let mut report = ErrorReport {
            level: level.to_string(),
            message: masked,
            error_type: info.kind.as_str().to_string(),
            error_code: info.code.clone(),
            timestamp: Utc::now().to_rfc3339(),
            category: None,
            severity: None,
            full_masked_error: None,
            context: None,
            error_category: None,
        };

        match tier {
            MaskLevel::Debug => {
                report.category = Some(info.category.as_str().to_string());
                report.severity = Some(info.severity.as_str().to_string());
                // At this tier the masked message *is* the redactor output.
                report.full_masked_error = Some(report.message.clone());
                report.context = Some(context);
            }
            MaskLevel::Warning => {
                report.category = Some(info.category.as_str().to_string());
                report.severity = Some(info.severity.as_str().to_string());
            }
            MaskLevel::Error => {
                report.error_category = Some(info.category.as_str().to_string());
            }
            MaskLevel::Info => {}
        }

        report
    }

    /// The fixed, user-safe sentence for this message's classified kind.
    pub fn user_message(&self, message: &str) -> &'static str {
        policy::user_sentence(self.identify(message).kind)
    }
}

impl Default for SqlErrorMasker {
    fn default() -> Self {
        Self::new(MaskerOptions::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
