//! Fuzz target: `SimConfig` JSON loading
//!
//! Parses arbitrary bytes as a config file and verifies:
//! - No panics from `from_json` or `validate`
//! - Any config that validates can drive a controller step without
//!   leaving the configured range
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use fuzzytherm::config::SimConfig;
use fuzzytherm::fsm::context::SimContext;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = SimConfig::from_json(text) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    let mut ctx = SimContext::new(config);
    for _ in 0..8 {
        let sample = ctx.step();
        assert!(sample.temperature_c.is_finite());
        assert!(ctx.config.in_range(sample.temperature_c));
        assert!((-1.0..=1.0).contains(&sample.power));
    }
});
