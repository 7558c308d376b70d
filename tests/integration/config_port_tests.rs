//! ConfigPort adapters against the app service.
//!
//! Covers the in-memory mock and the JSON file adapter, including the
//! restore-a-session path: save live settings, construct a fresh service
//! from the stored file, get the same target and season back.

use std::fs;

use super::mock_io::{MemoryConfig, RecordingSink};

use fuzzytherm::adapters::config_file::JsonFileConfig;
use fuzzytherm::app::commands::AppCommand;
use fuzzytherm::app::ports::{ConfigError, ConfigPort};
use fuzzytherm::app::service::AppService;
use fuzzytherm::config::SimConfig;
use fuzzytherm::plant::AmbientMode;

#[test]
fn empty_memory_store_reports_not_found() {
    let store = MemoryConfig::new();
    assert_eq!(store.load(), Err(ConfigError::NotFound));
}

#[test]
fn memory_store_rejects_invalid_config() {
    let store = MemoryConfig::new();
    let cfg = SimConfig {
        defuzz_samples: 1,
        ..SimConfig::default()
    };
    assert!(matches!(store.save(&cfg), Err(ConfigError::ValidationFailed(_))));
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn session_restores_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fuzzytherm.json");
    let store = JsonFileConfig::new(&path);

    let mut sink = RecordingSink::new();
    let mut app = AppService::new(store.load_or_default().unwrap());
    app.boot(&mut sink);
    app.handle_command(AppCommand::SetTarget(19.5), &mut sink).unwrap();
    app.handle_command(AppCommand::SetMode(AmbientMode::Winter), &mut sink)
        .unwrap();
    app.force_save_if_dirty(&store);
    assert!(path.exists());

    let restored = AppService::new(store.load().unwrap());
    assert_eq!(restored.target_c(), 19.5);
    assert_eq!(restored.mode(), AmbientMode::Winter);
    assert_eq!(restored.temperature_c(), 18.0);
}

#[test]
fn partial_json_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fuzzytherm.json");
    fs::write(
        &path,
        r#"{ "initial_temperature_c": 30.0, "ambient_mode": "winter" }"#,
    )
    .unwrap();

    let cfg = JsonFileConfig::new(&path).load().unwrap();
    assert_eq!(cfg.initial_temperature_c, 30.0);
    assert_eq!(cfg.ambient_mode, AmbientMode::Winter);
    assert_eq!(cfg.tick_secs, SimConfig::default().tick_secs);
    assert_eq!(cfg.rule_base, SimConfig::default().rule_base);
}

#[test]
fn auto_save_writes_file_after_delay() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fuzzytherm.json");
    let store = JsonFileConfig::new(&path);
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(SimConfig::default());
    app.boot(&mut sink);

    app.handle_command(AppCommand::RaiseTarget, &mut sink).unwrap();
    assert!(!app.auto_save_if_needed(&store));
    assert!(!path.exists());

    for _ in 0..10 {
        app.tick(&mut sink);
    }
    assert!(app.auto_save_if_needed(&store));
    assert_eq!(store.load().unwrap().target_temperature_c, 22.5);
}
