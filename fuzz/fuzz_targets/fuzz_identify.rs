#![no_main]

use libfuzzer_sys::fuzz_target;

// Classification and code extraction must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(message) = std::str::from_utf8(data) {
        let info = sqlveil::identify(message);
        assert!(!info.description.is_empty());
        let _ = sqlveil::extract_code(Some(message));
        let _ = sqlveil::has_code(["23505", "42s01"], message);
    }
});
