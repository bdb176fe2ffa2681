//! Free-function surface over a process-wide default engine.
//!
//! Most call sites sit inside `catch`/`map_err` arms and want a one-liner,
//! not an engine to thread around. The functions here delegate to a single
//! lazily-built [`SqlErrorMasker`] with default options. The engine is
//! immutable after construction, so sharing it across every thread in the
//! process needs no locking.
//!
//! Construct your own [`SqlErrorMasker`] instead when you need a non-default
//! scan cap or custom table-name conventions.

use std::sync::LazyLock;

use serde_json::{Map, Value};

use crate::classify::ErrorInfo;
use crate::codes::CodeList;
use crate::policy::ErrorReport;
use crate::SqlErrorMasker;

static DEFAULT_MASKER: LazyLock<SqlErrorMasker> = LazyLock::new(SqlErrorMasker::default);

/// Classify a raw message; see [`SqlErrorMasker::identify`].
pub fn identify(message: &str) -> ErrorInfo {
    DEFAULT_MASKER.identify(message)
}

/// Mask a raw message for a tier; see [`SqlErrorMasker::mask`].
pub fn mask(message: &str, level: &str) -> String {
    DEFAULT_MASKER.mask(message, level)
}

/// Build a structured report with an empty context map; see
/// [`SqlErrorMasker::process`].
pub fn process(message: &str, level: &str) -> ErrorReport {
    DEFAULT_MASKER.process(message, level)
}

/// Build a structured report with caller context; see
/// [`SqlErrorMasker::process_with_context`].
pub fn process_with_context(
    message: &str,
    level: &str,
    context: Map<String, Value>,
) -> ErrorReport {
    DEFAULT_MASKER.process_with_context(message, level, context)
}

/// The fixed user-safe sentence for a message; see
/// [`SqlErrorMasker::user_message`].
pub fn user_message(message: &str) -> &'static str {
    DEFAULT_MASKER.user_message(message)
}

/// Extract the SQLSTATE or vendor code; see
/// [`SqlErrorMasker::extract_code`].
pub fn extract_code(message: Option<&str>) -> Option<String> {
    DEFAULT_MASKER.extract_code(message)
}

/// Code membership test; see [`SqlErrorMasker::has_code`].
pub fn has_code<C: CodeList>(codes: C, message: &str) -> bool {
    DEFAULT_MASKER.has_code(codes, message)
}

/// Kind comparison; see [`SqlErrorMasker::is_type`].
pub fn is_type(kind: &str, message: &str) -> bool {
    DEFAULT_MASKER.is_type(kind, message)
}

/// See [`SqlErrorMasker::is_resource_exists`].
pub fn is_resource_exists(message: &str) -> bool {
    DEFAULT_MASKER.is_resource_exists(message)
}

/// See [`SqlErrorMasker::is_resource_not_found`].
pub fn is_resource_not_found(message: &str) -> bool {
    DEFAULT_MASKER.is_resource_not_found(message)
}

/// See [`SqlErrorMasker::is_duplicate_data`].
pub fn is_duplicate_data(message: &str) -> bool {
    DEFAULT_MASKER.is_duplicate_data(message)
}

/// See [`SqlErrorMasker::is_query_error`].
pub fn is_query_error(message: &str) -> bool {
    DEFAULT_MASKER.is_query_error(message)
}

/// See [`SqlErrorMasker::is_connection_error`].
pub fn is_connection_error(message: &str) -> bool {
    DEFAULT_MASKER.is_connection_error(message)
}

/// See [`SqlErrorMasker::is_constraint_violation`].
pub fn is_constraint_violation(message: &str) -> bool {
    DEFAULT_MASKER.is_constraint_violation(message)
}
