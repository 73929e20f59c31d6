//! Parameter-set parsing and algorithm construction from arbitrary text

#![no_main]

use libfuzzer_sys::fuzz_target;
use tctau_algo::build_algorithm;
use tctau_core::ParameterSet;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = [
        ParameterSet::from_toml_str(text),
        ParameterSet::from_json_str(text),
    ];
    for params in parsed.into_iter().flatten() {
        // Configuration errors are fine, panics are not
        let _ = build_algorithm(&params);
    }
});
