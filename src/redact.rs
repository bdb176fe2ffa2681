//! Ordered pattern redaction for raw driver messages.
//!
//! The redactor rewrites sensitive substrings to fixed placeholder tokens
//! while preserving overall message structure, so an operator can still see
//! the shape of the failure. It always runs over the **untruncated**
//! original: the scan-window cap applies to classification only, never to
//! scrubbing.
//!
//! # Rule Ordering
//!
//! Rules are an explicit ordered sequence, each applied to the output of the
//! previous one. Order is load-bearing: quoted and backtick-delimited tokens
//! go first so a quoted date literal is consumed whole instead of being
//! partially rewritten by the looser bare-date pattern further down.
//!
//! # Idempotence
//!
//! Placeholder tokens (`[REDACTED]`, `[DATE]`, `[TIME]`, `[UUID]`,
//! `[NUMBER]`, `[TABLE]`, `[DATE_ID]`, `[PATH]`, `:[LINE])`) contain no
//! quotes, digits, or slashes, so they never re-match any rule. Redacting an
//! already-redacted message is a no-op.
//!
//! # Buffer Hygiene
//!
//! Every intermediate buffer still holds partially-unredacted text, so each
//! one is zeroized before drop. Only the fully-scrubbed result leaves this
//! module.

use regex::Regex;
use smallvec::SmallVec;
use zeroize::Zeroize;

/// Table-name conventions redacted by default: an organization prefix and two
/// sensitive business domains. Replaceable per engine via
/// [`Redactor::with_table_patterns`].
pub const DEFAULT_TABLE_PATTERNS: &[&str] = &[r"trx_\w+", r"\w*payout\w*", r"\w*vendor\w*"];

/// One redaction step: a pattern and its literal (or `$n`-templated)
/// replacement.
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

/// Rules applied before the configurable table-name rule, in order.
const PRE_TABLE_RULES: &[(&str, &str)] = &[
    // Backtick-quoted identifiers.
    (r"`[^`]*`", "[REDACTED]"),
    // Single-quoted literals.
    (r"'[^']*'", "[REDACTED]"),
    // Double-quoted literals.
    (r#""[^"]*""#, "[REDACTED]"),
    // ISO dates. No \b anchors: in 2024-01-15T10:30:00 the date abuts the
    // 'T', which \b would treat as the same word.
    (r"\d{4}-\d{2}-\d{2}", "[DATE]"),
    // Times, same anchoring rationale (trailing Z, leading T).
    (r"\d{1,2}:\d{2}:\d{2}", "[TIME]"),
    // UUIDs.
    (
        r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
        "[UUID]",
    ),
    // Long numerals (account numbers, row ids, epoch stamps).
    (r"\b\d{10,}\b", "[NUMBER]"),
];

/// Rules applied after the configurable table-name rule, in order.
const POST_TABLE_RULES: &[(&str, &str)] = &[
    // 8-digit date-like identifiers (20YYMMDD batch ids).
    (r"\b20\d{6}\b", "[DATE_ID]"),
    // Explicit server metadata tokens.
    (r"(?i)\b(Database|Connection):\s*[^\s,;)]+", "$1: [REDACTED]"),
    // Windows-style paths.
    (r"\b[A-Za-z]:[\\/][^\s'\x22]+", "[PATH]"),
    // PHP source paths as emitted by driver backtraces.
    (r"(?:/[\w.\-]+)+\.php\b", "[PATH]"),
    // Trailing line-number suffixes left after path rewriting.
    (r":\d+\)", ":[LINE])"),
];

/// Applies the ordered rule list cumulatively over a message.
///
/// Compiled once, immutable afterwards; safe for unrestricted concurrent use.
pub struct Redactor {
    rules: SmallVec<[Rule; 16]>,
}

impl Redactor {
    /// Redactor with the default rule set, including the built-in table-name
    /// conventions.
    pub fn new() -> Self {
        Self::with_table_patterns(DEFAULT_TABLE_PATTERNS)
    }

    /// Redactor with custom table-name convention patterns in place of
    /// [`DEFAULT_TABLE_PATTERNS`].
    ///
    /// Each pattern is a regex alternative matched case-insensitively on
    /// word boundaries. An empty slice disables the table-name rule
    /// entirely; every other rule keeps its fixed position.
    ///
    /// # Panics
    ///
    /// Panics if a supplied pattern does not compile. Convention patterns
    /// are deployment configuration, not user input; an invalid one is a
    /// defect to surface at startup, not to swallow per message.
    pub fn with_table_patterns<S: AsRef<str>>(table_patterns: &[S]) -> Self {
        let mut rules = SmallVec::new();

        for &(pattern, replacement) in PRE_TABLE_RULES {
            rules.push(Rule {
                pattern: compile(pattern),
                replacement,
            });
        }

        if !table_patterns.is_empty() {
            let alternatives = table_patterns
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{alternatives})\b");
            rules.push(Rule {
                pattern: compile(&pattern),
                replacement: "[TABLE]",
            });
        }

        for &(pattern, replacement) in POST_TABLE_RULES {
            rules.push(Rule {
                pattern: compile(pattern),
                replacement,
            });
        }

        Self { rules }
    }

    /// Apply every rule in order and return the scrubbed copy.
    ///
    /// Intermediate buffers are wiped before drop; the input itself is
    /// untouched and remains the caller's responsibility.
    pub fn redact(&self, message: &str) -> String {
        let mut current = message.to_string();

        for rule in &self.rules {
            let next = match rule.pattern.replace_all(&current, rule.replacement) {
                std::borrow::Cow::Borrowed(_) => continue,
                std::borrow::Cow::Owned(next) => next,
            };
            let mut previous = std::mem::replace(&mut current, next);
            previous.zeroize();
        }

        current
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|err| panic!("redaction pattern {pattern:?} failed to compile: {err}"))
}

// ============================================================================
// Tests
// ============================================================================
