//! Fuzz target: fuzzy inference and one plant step
//!
//! Feeds arbitrary bit patterns (NaN, ±∞, subnormals included) as current
//! and target temperatures and verifies:
//! - No panics
//! - Power is finite and inside [-1, 1]
//! - The stepped temperature stays finite and inside the configured range
//!
//! cargo fuzz run fuzz_inference

#![no_main]

use fuzzytherm::config::SimConfig;
use fuzzytherm::control::FuzzyController;
use fuzzytherm::plant::{self, AmbientMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 17 {
        return;
    }
    let current = f64::from_le_bytes(data[0..8].try_into().unwrap());
    let target = f64::from_le_bytes(data[8..16].try_into().unwrap());
    let mode = if data[16] & 1 == 0 {
        AmbientMode::Summer
    } else {
        AmbientMode::Winter
    };

    let config = SimConfig::default();
    let controller = FuzzyController::from_config(&config);
    let out = controller.evaluate(current, target);
    assert!(out.power.is_finite());
    assert!((-1.0..=1.0).contains(&out.power));

    let start = plant::sanitize(
        current,
        config.initial_temperature_c,
        config.min_temperature_c,
        config.max_temperature_c,
    );
    let next = plant::step(start, out.power, mode, &config);
    assert!(next.is_finite());
    assert!(config.in_range(next));
});
