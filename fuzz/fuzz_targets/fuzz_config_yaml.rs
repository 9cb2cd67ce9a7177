//! Fuzzes calibration parsing and validation.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_config_yaml
#![no_main]
use libfuzzer_sys::fuzz_target;
use segway_core::prelude::*;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Must never panic; anything that validates must also build a core.
    if let Ok(config) = SegwayConfig::from_yaml_str(text) {
        assert!(Segway::new(config).is_ok());
    }
});
