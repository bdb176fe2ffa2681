#![no_main]

use libfuzzer_sys::fuzz_target;

// Masking must be total: any message at any tier, no panics.
fuzz_target!(|data: &[u8]| {
    if let Ok(message) = std::str::from_utf8(data) {
        for level in ["debug", "info", "warning", "error", "bogus"] {
            let _ = sqlveil::mask(message, level);
        }
        let _ = sqlveil::process(message, "debug");
        let _ = sqlveil::user_message(message);
    }
});
