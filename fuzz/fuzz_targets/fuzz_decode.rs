#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz the marker scanner - malformed fields must decode as absent
    // This should never panic, regardless of input
    let _ = beacon::config::decode(data);
});
