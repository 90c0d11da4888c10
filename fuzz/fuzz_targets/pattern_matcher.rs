#![no_main]

use charla::pattern::match_method_source;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert arbitrary bytes to UTF-8 string (lossy conversion)
    if let Ok(source) = std::str::from_utf8(data) {
        // Attempt to match the serialized method source
        // This should not panic regardless of input
        let _ = match_method_source(source);
    }
});
