//! Fuzz target: `MissionConfig::from_json`
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Anything accepted also passes `validate()`
//! - Accepted range thresholds keep a non-empty hysteresis band
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use hoopbot::config::MissionConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = MissionConfig::from_json(text) {
        assert!(config.validate().is_ok());
        assert!(config.sensors.range_near_threshold < config.sensors.range_far_threshold);
    }
});
