#![no_main]

use libfuzzer_sys::fuzz_target;
use sqlveil::SqlErrorMasker;

// Redaction must be total and idempotent on arbitrary input.
fuzz_target!(|data: &[u8]| {
    if let Ok(message) = std::str::from_utf8(data) {
        let masker = SqlErrorMasker::default();
        let once = masker.redact(message);
        let twice = masker.redact(&once);
        assert_eq!(once, twice);
    }
});
