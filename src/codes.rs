//! SQL error code extraction and the code-to-description taxonomy.
//!
//! Raw driver messages identify themselves in two ways: a `SQLSTATE[...]`
//! marker (standard five-character class/subclass token) and a bare 4-digit
//! vendor numeral (MySQL-style error numbers). This module pulls either out
//! of a bounded scan window and maps known codes to short, leak-free
//! descriptions.
//!
//! # Extraction Policy
//!
//! Both searches run independently over the same scan window:
//!
//! 1. `SQLSTATE[<token>]` marker, case-insensitive; the token is upper-cased.
//! 2. A standalone 4-digit numeral anywhere in the window.
//!
//! When both hit, the 4-digit vendor code **overwrites** the SQLSTATE token.
//! This last-match-wins precedence is a compatibility contract, not an
//! accident: downstream systems key retry/alerting policy on the vendor
//! number when one is present. The `vendor_code_overrides_sqlstate_token`
//! test at the bottom of this file pins it.
//!
//! # Governance
//!
//! The description table and the per-kind whitelists are frozen const data.
//! No entries are added at runtime, and the table's sort order is enforced
//! by the `tests` module so binary-search lookup stays valid.
//!
//! # Security Properties
//!
//! Descriptions are generic condition names ("Table already exists", never
//! the table). A description can therefore surface at any observability
//! tier, including end-user-adjacent `info` lines.

use regex::Regex;
use smallvec::SmallVec;

/// Generic description used when the extracted code is unknown or absent.
pub const GENERIC_DESCRIPTION: &str = "Unspecified database error";

// ============================================================================
// Code-to-Description Table (Frozen)
// ============================================================================

/// Known SQLSTATE and MySQL vendor codes mapped to short descriptions.
///
/// Sorted by code (plain `&str` ordering) for binary-search lookup.
/// Lookup keys are normalized to upper-case first, so `42s01` and `42S01`
/// resolve identically.
static CODE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("08S01", "Communication link failure"),
    ("1044", "Access denied to database"),
    ("1045", "Access denied for user credentials"),
    ("1049", "Unknown database"),
    ("1050", "Table already exists"),
    ("1051", "Unknown table"),
    ("1054", "Unknown column in field list"),
    ("1062", "Duplicate entry for unique key"),
    ("1064", "Query error in SQL syntax"),
    ("1146", "Table does not exist"),
    ("1213", "Deadlock detected while locking"),
    ("1452", "Foreign key constraint fails"),
    ("2002", "Connection refused by server"),
    ("2006", "Server has gone away"),
    ("2013", "Lost connection during query"),
    ("23000", "Integrity constraint violation"),
    ("23505", "Unique constraint violation"),
    ("40001", "Serialization failure in transaction"),
    ("42000", "Syntax error or access violation"),
    ("42S01", "Base table or view already exists"),
    ("42S02", "Base table or view not found"),
];

/// Look up the short description for a known code.
///
/// Returns `None` for unknown codes; callers fall back to
/// [`GENERIC_DESCRIPTION`].
#[inline]
pub fn describe(code: &str) -> Option<&'static str> {
    let key = code.to_ascii_uppercase();
    CODE_DESCRIPTIONS
        .binary_search_by_key(&key.as_str(), |&(code, _)| code)
        .ok()
        .map(|idx| CODE_DESCRIPTIONS[idx].1)
}

// ============================================================================
// Per-Kind Code Whitelists (Frozen)
// ============================================================================

/// Canonical code sets backing the boolean predicates.
///
/// Each set lists the codes that imply a condition even when the keyword
/// heuristic misses it (drivers localize or abbreviate message text; codes
/// are stable). These are the **only** code sets the predicates consult.
pub mod known_codes {
    /// Codes meaning the schema object being created already exists.
    pub const RESOURCE_EXISTS: &[&str] = &["42S01", "1050"];

    /// Codes meaning a referenced schema object does not exist.
    pub const RESOURCE_NOT_FOUND: &[&str] = &["42S02", "1051", "1146"];

    /// Codes meaning a row-level uniqueness collision.
    pub const DUPLICATE_DATA: &[&str] = &["23000", "23505", "1062"];

    /// Codes meaning the statement itself was malformed or disallowed.
    pub const QUERY_ERROR: &[&str] = &["42000", "1064"];

    /// Codes meaning the server link failed or dropped.
    pub const CONNECTION_ERROR: &[&str] = &["08S01", "2002", "2006", "2013"];

    /// Codes meaning an integrity constraint was violated.
    ///
    /// The matching predicate has no keyword component: constraint failures
    /// are identified purely by code membership here.
    pub const CONSTRAINT_VIOLATION: &[&str] = &["23000", "23505", "1452"];
}

/// Case-insensitive membership test against a whitelist.
#[inline]
pub(crate) fn code_in(code: &str, set: &[&str]) -> bool {
    set.iter().any(|known| known.eq_ignore_ascii_case(code))
}

// ============================================================================
// Code Extractor
// ============================================================================

/// Compiled extraction patterns, built once per engine.
///
/// Holding compiled `Regex` values in the engine (rather than re-compiling
/// per call) keeps extraction allocation-light and lets the engine be shared
/// freely across threads: `Regex` is `Send + Sync` and never mutated.
pub(crate) struct CodeExtractor {
    sqlstate: Regex,
    vendor: Regex,
}

impl CodeExtractor {
    /// Compile the two extraction patterns.
    ///
    /// # Panics
    ///
    /// Panics if a pattern fails to compile. Both patterns are literals in
    /// this file; a failure is a programming defect on par with a failed
    /// const assertion, never a runtime condition.
    pub(crate) fn new() -> Self {
        Self {
            sqlstate: Regex::new(r"(?i)sqlstate\[([0-9a-z]+)\]")
                .expect("SQLSTATE marker pattern must compile"),
            vendor: Regex::new(r"\b\d{4}\b").expect("vendor code pattern must compile"),
        }
    }

    /// Find the error code in an already-truncated scan window.
    ///
    /// Applies the extraction policy documented at module level: SQLSTATE
    /// marker first, then a standalone 4-digit numeral that overwrites it.
    pub(crate) fn find(&self, scan: &str) -> Option<String> {
        let mut code = self
            .sqlstate
            .captures(scan)
            .map(|caps| caps[1].to_ascii_uppercase());

        // Deliberate overwrite: a bare 4-digit vendor numeral wins over the
        // SQLSTATE token when both are present.
        if let Some(found) = self.vendor.find(scan) {
            code = Some(found.as_str().to_string());
        }

        code
    }
}

/// Truncate to at most `max_len` bytes, backing up to a char boundary.
///
/// Byte-based with a boundary walk so multi-byte input near the limit never
/// splits a character.
pub(crate) fn truncate_to_boundary(message: &str, max_len: usize) -> &str {
    if message.len() <= max_len {
        return message;
    }
    let mut idx = max_len;
    while idx > 0 && !message.is_char_boundary(idx) {
        idx -= 1;
    }
    &message[..idx]
}

// ============================================================================
// Code List Argument (one code or many)
// ============================================================================

/// Accepted argument shapes for [`has_code`](crate::SqlErrorMasker::has_code):
/// a single code or a list of codes.
///
/// All comparisons ignore ASCII case, so `"42s01"` matches a message carrying
/// `SQLSTATE[42S01]`.
pub trait CodeList {
    /// True when any code in this list matches `found`, ignoring ASCII case.
    fn matches_code(&self, found: &str) -> bool;
}

impl CodeList for &str {
    fn matches_code(&self, found: &str) -> bool {
        self.eq_ignore_ascii_case(found)
    }
}

impl CodeList for String {
    fn matches_code(&self, found: &str) -> bool {
        self.eq_ignore_ascii_case(found)
    }
}

impl CodeList for &[&str] {
    fn matches_code(&self, found: &str) -> bool {
        self.iter().any(|code| code.eq_ignore_ascii_case(found))
    }
}

impl<const N: usize> CodeList for [&str; N] {
    fn matches_code(&self, found: &str) -> bool {
        self.as_slice().matches_code(found)
    }
}

impl CodeList for &[String] {
    fn matches_code(&self, found: &str) -> bool {
        self.iter().any(|code| code.eq_ignore_ascii_case(found))
    }
}

impl CodeList for Vec<&str> {
    fn matches_code(&self, found: &str) -> bool {
        self.as_slice().matches_code(found)
    }
}

impl CodeList for Vec<String> {
    fn matches_code(&self, found: &str) -> bool {
        self.as_slice().matches_code(found)
    }
}

impl<S: AsRef<str>, const N: usize> CodeList for SmallVec<[S; N]>
where
    [S; N]: smallvec::Array<Item = S>,
{
    fn matches_code(&self, found: &str) -> bool {
        self.iter().any(|code| code.as_ref().eq_ignore_ascii_case(found))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn find(message: &str) -> Option<String> {
        let scan = truncate_to_boundary(message, crate::DEFAULT_MAX_SCAN_LEN).to_ascii_lowercase();
        CodeExtractor::new().find(&scan)
    }

    // ========================================================================
    // Table Governance Tests
    // ========================================================================

    #[test]
    fn description_table_is_sorted_and_unique() {
        for pair in CODE_DESCRIPTIONS.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "table out of order near {:?}",
                pair[1].0
            );
        }
    }

    #[test]
    fn description_table_keys_are_normalized() {
        for (code, description) in CODE_DESCRIPTIONS {
            assert_eq!(*code, code.to_ascii_uppercase(), "key not upper-cased");
            assert!(!description.is_empty());
        }
    }

    #[test]
    fn whitelist_codes_have_descriptions() {
        let sets = [
            known_codes::RESOURCE_EXISTS,
            known_codes::RESOURCE_NOT_FOUND,
            known_codes::DUPLICATE_DATA,
            known_codes::QUERY_ERROR,
            known_codes::CONNECTION_ERROR,
            known_codes::CONSTRAINT_VIOLATION,
        ];
        for set in sets {
            for code in set {
                assert!(describe(code).is_some(), "no description for {code}");
            }
        }
    }

    // ========================================================================
    // Lookup Tests
    // ========================================================================

    #[test]
    fn describe_known_codes() {
        assert_eq!(describe("42S01"), Some("Base table or view already exists"));
        assert_eq!(describe("1146"), Some("Table does not exist"));
        assert_eq!(describe("23505"), Some("Unique constraint violation"));
    }

    #[test]
    fn describe_is_case_insensitive() {
        assert_eq!(describe("42s01"), describe("42S01"));
        assert_eq!(describe("08s01"), describe("08S01"));
    }

    #[test]
    fn describe_unknown_code() {
        assert_eq!(describe("99999"), None);
        assert_eq!(describe(""), None);
    }

    // ========================================================================
    // Extraction Tests
    // ========================================================================

    #[test]
    fn extracts_sqlstate_token() {
        assert_eq!(find("SQLSTATE[42S01]: table exists"), Some("42S01".into()));
    }

    #[test]
    fn sqlstate_marker_is_case_insensitive() {
        assert_eq!(find("sqlstate[hy000]: general error"), Some("HY000".into()));
    }

    #[test]
    fn extracts_bare_vendor_code() {
        assert_eq!(find("error 1064 near SELECT"), Some("1064".into()));
    }

    #[test]
    fn vendor_code_overrides_sqlstate_token() {
        // Compatibility pin: the 4-digit vendor numeral wins even though the
        // SQLSTATE marker appears first in the message.
        let message = "SQLSTATE[42000]: Syntax error or access violation: 1064 near 'SELECT'";
        assert_eq!(find(message), Some("1064".into()));
    }

    #[test]
    fn five_digit_numeral_is_not_a_vendor_code() {
        // 42000 inside the marker is five digits; no standalone 4-digit run
        // exists, so the SQLSTATE token stands.
        let message = "SQLSTATE[42000]: Syntax error or access violation";
        assert_eq!(find(message), Some("42000".into()));
    }

    #[test]
    fn digits_embedded_in_longer_runs_do_not_match() {
        assert_eq!(find("id 123456 violated nothing"), None);
    }

    #[test]
    fn no_code_found() {
        assert_eq!(find("something went wrong"), None);
        assert_eq!(find(""), None);
    }

    #[test]
    fn code_beyond_scan_window_is_ignored() {
        let mut message = "x".repeat(crate::DEFAULT_MAX_SCAN_LEN);
        message.push_str(" 1064");
        assert_eq!(find(&message), None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let message = "й".repeat(6000); // 2 bytes each
        let window = truncate_to_boundary(&message, 8000);
        assert!(window.len() <= 8000);
        assert!(std::str::from_utf8(window.as_bytes()).is_ok());
    }

    // ========================================================================
    // Code List Tests
    // ========================================================================

    #[test]
    fn code_list_single_and_slice() {
        assert!("42s01".matches_code("42S01"));
        assert!(["23000", "23505"].matches_code("23505"));
        assert!(!["23000", "23505"].matches_code("1452"));
    }

    #[test]
    fn code_in_ignores_case() {
        assert!(code_in("42s01", known_codes::RESOURCE_EXISTS));
        assert!(!code_in("1064", known_codes::RESOURCE_EXISTS));
    }
}
