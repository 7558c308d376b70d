//! Integration tests for the AppService → FSM → controller → room pipeline.
//!
//! These drive the service exactly as a GUI timer would and assert on the
//! events that reach the sink.

use super::mock_io::{MemoryConfig, RecordingSink};

use fuzzytherm::app::commands::AppCommand;
use fuzzytherm::app::events::AppEvent;
use fuzzytherm::app::service::AppService;
use fuzzytherm::config::SimConfig;
use fuzzytherm::control::rules::Action;
use fuzzytherm::error::{ConfigError, Error};
use fuzzytherm::fsm::RunState;
use fuzzytherm::plant::AmbientMode;

fn make_app() -> (AppService, RecordingSink) {
    let mut app = AppService::new(SimConfig::default());
    let mut sink = RecordingSink::new();
    app.boot(&mut sink);
    (app, sink)
}

fn run(app: &mut AppService, sink: &mut RecordingSink, ticks: usize) {
    for _ in 0..ticks {
        app.tick(sink);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn boot_announces_stopped() {
    let (app, sink) = make_app();
    assert_eq!(app.state(), RunState::Stopped);
    assert_eq!(sink.events, vec![AppEvent::Started(RunState::Stopped)]);
}

#[test]
fn ticks_while_stopped_change_nothing() {
    let (mut app, mut sink) = make_app();
    sink.clear();
    run(&mut app, &mut sink, 20);
    assert!(sink.events.is_empty());
    assert_eq!(app.temperature_c(), 18.0);
    assert_eq!(app.tick_index(), 0);
    assert_eq!(app.tick_count(), 20);
}

#[test]
fn first_step_applies_half_heating() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    let s = app.tick(&mut sink).expect("running tick yields a sample");

    assert_eq!(s.tick, 1);
    assert_eq!(s.time_secs, 0.5);
    assert!((s.power - 0.5).abs() < 1e-6, "power = {}", s.power);
    assert_eq!(s.action, Action::Heat);
    // 18 + 0.5·0.8·0.5 + 0.05·0.5
    assert!((s.temperature_c - 18.225).abs() < 1e-6);
    assert_eq!(app.last_output().action, Action::Heat);
}

#[test]
fn start_emits_state_change_and_numbered_samples() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 5);

    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: RunState::Stopped,
        to: RunState::Running,
    }));
    let ticks: Vec<u64> = sink.samples().iter().map(|s| s.tick).collect();
    assert_eq!(ticks, vec![1, 2, 3, 4, 5]);
}

#[test]
fn pause_freezes_and_resume_continues() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 3);
    app.handle_command(AppCommand::Pause, &mut sink).unwrap();
    let frozen = app.temperature_c();

    run(&mut app, &mut sink, 10);
    assert_eq!(app.state(), RunState::Paused);
    assert_eq!(app.temperature_c(), frozen);
    assert_eq!(sink.samples().len(), 3);

    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    let s = app.tick(&mut sink).unwrap();
    assert_eq!(s.tick, 4);
}

#[test]
fn invalid_requests_are_silent_no_ops() {
    let (mut app, mut sink) = make_app();
    sink.clear();
    app.handle_command(AppCommand::Pause, &mut sink).unwrap();
    assert_eq!(app.state(), RunState::Stopped);
    assert!(sink.events.is_empty());

    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    sink.clear();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    assert_eq!(app.state(), RunState::Running);
    assert!(sink.events.is_empty());
}

#[test]
fn reset_restores_initial_conditions_but_keeps_settings() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::SetTarget(25.0), &mut sink).unwrap();
    app.handle_command(AppCommand::ToggleMode, &mut sink).unwrap();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 30);
    assert!(app.temperature_c() > 18.0);
    sink.clear();

    app.handle_command(AppCommand::Reset, &mut sink).unwrap();

    assert_eq!(app.state(), RunState::Stopped);
    assert_eq!(app.temperature_c(), 18.0);
    assert_eq!(app.tick_index(), 0);
    assert!(app.history().is_empty());
    assert_eq!(app.last_output().power, 0.0);
    assert_eq!(app.target_c(), 25.0);
    assert_eq!(app.mode(), AmbientMode::Winter);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::StateChanged {
                from: RunState::Running,
                to: RunState::Stopped,
            },
            AppEvent::SimulationReset { temperature_c: 18.0 },
        ]
    );
}

#[test]
fn reset_twice_matches_reset_once() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 12);

    app.handle_command(AppCommand::Reset, &mut sink).unwrap();
    let once = (app.build_telemetry(), app.history().len());
    app.handle_command(AppCommand::Reset, &mut sink).unwrap();
    let twice = (app.build_telemetry(), app.history().len());
    assert_eq!(once, twice);
}

// ── Operator inputs ───────────────────────────────────────────

#[test]
fn target_is_clamped_to_range() {
    let (mut app, mut sink) = make_app();
    sink.clear();
    app.handle_command(AppCommand::SetTarget(100.0), &mut sink).unwrap();
    assert_eq!(app.target_c(), 50.0);
    assert_eq!(
        sink.events,
        vec![AppEvent::TargetChanged { from: 22.0, to: 50.0 }]
    );

    app.handle_command(AppCommand::SetTarget(-5.0), &mut sink).unwrap();
    assert_eq!(app.target_c(), 0.0);
}

#[test]
fn non_finite_target_is_ignored() {
    let (mut app, mut sink) = make_app();
    sink.clear();
    app.handle_command(AppCommand::SetTarget(f64::NAN), &mut sink).unwrap();
    assert_eq!(app.target_c(), 22.0);
    assert!(sink.events.is_empty());
    assert!(!app.is_config_dirty());
}

#[test]
fn raise_and_lower_step_like_buttons() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::RaiseTarget, &mut sink).unwrap();
    app.handle_command(AppCommand::RaiseTarget, &mut sink).unwrap();
    assert_eq!(app.target_c(), 23.0);
    for _ in 0..3 {
        app.handle_command(AppCommand::LowerTarget, &mut sink).unwrap();
    }
    assert_eq!(app.target_c(), 21.5);
}

#[test]
fn target_buttons_follow_configured_step() {
    let (mut app, mut sink) = make_app();
    let coarse = SimConfig {
        target_step_c: 2.0,
        ..SimConfig::default()
    };
    app.handle_command(AppCommand::UpdateConfig(coarse), &mut sink).unwrap();
    sink.clear();
    app.handle_command(AppCommand::RaiseTarget, &mut sink).unwrap();
    assert_eq!(app.target_c(), 24.0);
    app.handle_command(AppCommand::LowerTarget, &mut sink).unwrap();
    app.handle_command(AppCommand::LowerTarget, &mut sink).unwrap();
    assert_eq!(app.target_c(), 20.0);
    assert_eq!(
        sink.events[0],
        AppEvent::TargetChanged { from: 22.0, to: 24.0 }
    );
}

#[test]
fn raise_at_upper_bound_is_silent() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::SetTarget(50.0), &mut sink).unwrap();
    sink.clear();
    app.handle_command(AppCommand::RaiseTarget, &mut sink).unwrap();
    assert_eq!(app.target_c(), 50.0);
    assert!(sink.events.is_empty());
}

#[test]
fn mode_toggle_emits_once_per_change() {
    let (mut app, mut sink) = make_app();
    sink.clear();
    app.handle_command(AppCommand::ToggleMode, &mut sink).unwrap();
    app.handle_command(AppCommand::SetMode(AmbientMode::Winter), &mut sink)
        .unwrap();
    assert_eq!(app.mode(), AmbientMode::Winter);
    assert_eq!(sink.events, vec![AppEvent::ModeChanged(AmbientMode::Winter)]);
}

// ── Telemetry and closed-loop behaviour ───────────────────────

#[test]
fn telemetry_every_configured_ticks() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 25);
    let telemetry = sink.count(|e| matches!(e, AppEvent::Telemetry(_)));
    assert_eq!(telemetry, 2);
}

#[test]
fn summer_run_converges_near_target() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 240);

    assert!((app.temperature_c() - 22.0).abs() < 1.0, "T = {}", app.temperature_c());
    assert_eq!(app.history().len(), 120);
    let ticks: Vec<u64> = app.history().iter().map(|s| s.tick).collect();
    assert_eq!(ticks.first(), Some(&121));
    assert_eq!(ticks.last(), Some(&240));
}

#[test]
fn winter_run_heats_on_average() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::SetMode(AmbientMode::Winter), &mut sink)
        .unwrap();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 400);

    let samples = sink.samples();
    let mean = samples.iter().map(|s| s.power).sum::<f64>() / samples.len() as f64;
    assert!(mean >= 0.0, "mean power = {mean}");
    assert!(app.temperature_c() > 18.0);
}

#[test]
fn cooling_target_drives_temperature_down() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::SetTarget(10.0), &mut sink).unwrap();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    let s = app.tick(&mut sink).unwrap();
    assert_eq!(s.action, Action::Cool);
    run(&mut app, &mut sink, 200);
    assert!((app.temperature_c() - 10.0).abs() < 1.0, "T = {}", app.temperature_c());
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn invalid_config_update_is_rejected() {
    let (mut app, mut sink) = make_app();
    sink.clear();
    let bad = SimConfig {
        max_temperature_c: -10.0,
        ..SimConfig::default()
    };
    let err = app.handle_command(AppCommand::UpdateConfig(bad), &mut sink);
    assert!(matches!(
        err,
        Err(Error::Config(ConfigError::ValidationFailed(_)))
    ));
    assert!(sink.events.is_empty());
    assert!(!app.is_config_dirty());
    assert_eq!(app.current_config(), SimConfig::default());
}

#[test]
fn config_update_applies_target_and_gain() {
    let (mut app, mut sink) = make_app();
    sink.clear();
    let cfg = SimConfig {
        target_temperature_c: 24.0,
        actuator_gain_c_per_sec: 1.6,
        ..SimConfig::default()
    };
    app.handle_command(AppCommand::UpdateConfig(cfg), &mut sink).unwrap();

    assert_eq!(app.target_c(), 24.0);
    assert!(app.is_config_dirty());
    assert_eq!(
        sink.events,
        vec![
            AppEvent::TargetChanged { from: 22.0, to: 24.0 },
            AppEvent::ConfigUpdated,
        ]
    );

    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    let s = app.tick(&mut sink).unwrap();
    // error 6 → PS/PL overlap; the doubled gain must show in the step
    assert!(s.temperature_c - 18.0 > 0.4, "T = {}", s.temperature_c);
}

#[test]
fn config_update_reports_target_before_range_change() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::SetTarget(45.0), &mut sink).unwrap();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 4);
    sink.clear();

    let narrow = SimConfig {
        max_temperature_c: 30.0,
        target_temperature_c: 25.0,
        ambient_mode: AmbientMode::Winter,
        ..SimConfig::default()
    };
    app.handle_command(AppCommand::UpdateConfig(narrow), &mut sink).unwrap();

    assert_eq!(app.target_c(), 25.0);
    assert_eq!(app.mode(), AmbientMode::Winter);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::TargetChanged { from: 45.0, to: 25.0 },
            AppEvent::ModeChanged(AmbientMode::Winter),
            AppEvent::ConfigUpdated,
        ]
    );
}

#[test]
fn changing_tick_length_keeps_time_continuous() {
    let (mut app, mut sink) = make_app();
    app.handle_command(AppCommand::Start, &mut sink).unwrap();
    run(&mut app, &mut sink, 4);
    let fast = SimConfig {
        tick_secs: 0.1,
        ..SimConfig::default()
    };
    app.handle_command(AppCommand::UpdateConfig(fast), &mut sink).unwrap();
    run(&mut app, &mut sink, 2);

    let times: Vec<f64> = sink.samples().iter().map(|s| s.time_secs).collect();
    assert_eq!(times.len(), 6);
    assert_eq!(times[3], 2.0);
    assert!((times[4] - 2.1).abs() < 1e-12);
    assert!((times[5] - 2.2).abs() < 1e-12);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    assert!((app.build_telemetry().time_secs - 2.2).abs() < 1e-12);
}

#[test]
fn auto_save_waits_for_settling_delay() {
    let (mut app, mut sink) = make_app();
    let store = MemoryConfig::new();
    app.handle_command(AppCommand::SetTarget(23.0), &mut sink).unwrap();
    assert!(app.is_config_dirty());

    // 5 s at 0.5 s per tick
    run(&mut app, &mut sink, 9);
    assert!(!app.auto_save_if_needed(&store));
    run(&mut app, &mut sink, 1);
    assert!(app.auto_save_if_needed(&store));

    assert!(!app.is_config_dirty());
    assert_eq!(store.saves.get(), 1);
    assert_eq!(store.stored().unwrap().target_temperature_c, 23.0);
}

#[test]
fn save_config_flushes_on_next_check() {
    let (mut app, mut sink) = make_app();
    let store = MemoryConfig::new();
    app.handle_command(AppCommand::SaveConfig, &mut sink).unwrap();
    assert!(app.auto_save_if_needed(&store));
    assert_eq!(store.stored(), Some(SimConfig::default()));
}

#[test]
fn failed_save_keeps_config_dirty() {
    let (mut app, mut sink) = make_app();
    let store = MemoryConfig::failing();
    app.handle_command(AppCommand::ToggleMode, &mut sink).unwrap();
    app.force_save_if_dirty(&store);
    assert!(app.is_config_dirty());

    let good = MemoryConfig::new();
    app.force_save_if_dirty(&good);
    assert!(!app.is_config_dirty());
    assert_eq!(good.stored().unwrap().ambient_mode, AmbientMode::Winter);
}
