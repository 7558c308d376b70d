//! FuzzyTherm — headless simulation driver.
//!
//! Plays the role of the GUI's timer: boots the service, presses Start,
//! then ticks at a fixed rate while the adapters log, record and persist.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                   │
//! │                                                             │
//! │  LogEventSink   RunLogSink (CSV)   SampleRecorder           │
//! │  (EventSink)    (EventSink)        (EventSink → metrics)    │
//! │  JsonFileConfig (ConfigPort)       simplelog (stderr)       │
//! │                                                             │
//! │  ──────────────── Port Trait Boundary ───────────────────   │
//! │                                                             │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │              AppService (pure logic)                  │  │
//! │  │  FSM · Fuzzy controller · Room model                  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info, warn};
use simplelog::WriteLogger;

use fuzzytherm::adapters::config_file::JsonFileConfig;
use fuzzytherm::adapters::csv_sink::RunLogSink;
use fuzzytherm::adapters::log_sink::LogEventSink;
use fuzzytherm::app::commands::AppCommand;
use fuzzytherm::app::events::AppEvent;
use fuzzytherm::app::ports::{ConfigPort, EventSink};
use fuzzytherm::app::service::AppService;
use fuzzytherm::config::SimConfig;
use fuzzytherm::metrics::{SampleRecorder, StepMetrics};
use fuzzytherm::plant::AmbientMode;

#[derive(Parser)]
#[command(name = "fuzzytherm")]
#[command(version)]
#[command(about = "Fuzzy-logic thermal controller simulation", long_about = None)]
struct Cli {
    /// JSON configuration file (created with --save-config)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of simulation steps to run
    #[arg(short = 'n', long, default_value = "240")]
    ticks: u64,

    /// Target temperature in °C (overrides the config)
    #[arg(short, long, value_name = "C")]
    target: Option<f64>,

    /// Season (overrides the config)
    #[arg(short, long, value_enum)]
    mode: Option<Season>,

    /// Sleep one tick period between steps
    #[arg(long)]
    realtime: bool,

    /// Write every sample to a CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Persist the final target and season back to --config
    #[arg(long, requires = "config")]
    save_config: bool,

    /// Log verbosity
    #[arg(long, value_enum, default_value = "info")]
    log_level: Level,
}

#[derive(Clone, Copy, ValueEnum)]
enum Season {
    Summer,
    Winter,
}

impl From<Season> for AmbientMode {
    fn from(s: Season) -> Self {
        match s {
            Season::Summer => AmbientMode::Summer,
            Season::Winter => AmbientMode::Winter,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<Level> for LevelFilter {
    fn from(l: Level) -> Self {
        match l {
            Level::Off => LevelFilter::Off,
            Level::Error => LevelFilter::Error,
            Level::Warn => LevelFilter::Warn,
            Level::Info => LevelFilter::Info,
            Level::Debug => LevelFilter::Debug,
            Level::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Logging ────────────────────────────────────────────
    init_logging(cli.log_level.into())?;
    info!("FuzzyTherm v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config (or defaults) ──────────────────────────
    let store = cli.config.as_ref().map(JsonFileConfig::new);
    let config = match &store {
        Some(s) => s
            .load_or_default()
            .with_context(|| format!("loading {}", s.path().display()))?,
        None => SimConfig::default(),
    };
    let initial_c = config.initial_temperature_c;
    let settle_band_c = config.settle_band_c;
    let tick = Duration::from_secs_f64(config.tick_secs);

    // ── 3. Construct adapters and the app service ─────────────
    let mut log_sink = LogEventSink::new();
    let mut recorder = SampleRecorder::new();
    let mut csv = match &cli.csv {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            Some(RunLogSink::new(BufWriter::new(file)))
        }
        None => None,
    };

    let mut app = AppService::new(config);
    app.boot(&mut log_sink);

    {
        let mut sink = (&mut log_sink, &mut recorder);
        if let Some(target) = cli.target {
            app.handle_command(AppCommand::SetTarget(target), &mut sink)?;
        }
        if let Some(mode) = cli.mode {
            app.handle_command(AppCommand::SetMode(mode.into()), &mut sink)?;
        }
        app.handle_command(AppCommand::Start, &mut sink)?;
    }

    // ── 4. Tick loop ──────────────────────────────────────────
    for _ in 0..cli.ticks {
        if cli.realtime {
            std::thread::sleep(tick);
        }
        let mut sink = (&mut log_sink, &mut recorder);
        match csv.as_mut() {
            Some(csv) => app.tick(&mut (sink, csv)),
            None => app.tick(&mut sink),
        };
    }

    let t = app.build_telemetry();
    log_sink.emit(&AppEvent::Telemetry(t));

    // ── 5. Flush outputs ──────────────────────────────────────
    if let Some(csv) = csv {
        let rows = csv.rows();
        csv.finish().context("writing CSV run log")?;
        info!("Wrote {rows} samples to CSV");
    }

    if let (true, Some(store)) = (cli.save_config, &store) {
        store
            .save(&app.current_config())
            .with_context(|| format!("saving {}", store.path().display()))?;
    }

    // ── 6. Summary ────────────────────────────────────────────
    match recorder.analyze(initial_c, settle_band_c) {
        Some(m) => print_summary(&app, &m),
        None => warn!("No samples recorded; nothing to analyse"),
    }
    Ok(())
}

/// Route the `log` facade to stderr so stdout carries only the summary.
fn init_logging(level: LevelFilter) -> Result<()> {
    WriteLogger::init(level, simplelog::Config::default(), std::io::stderr())
        .map_err(|e| anyhow::anyhow!("installing logger: {e}"))
}

fn print_summary(app: &AppService, m: &StepMetrics) {
    let fmt_secs = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |s| format!("{s:.1} s"));

    println!("steps            {}", app.tick_index());
    println!("mode             {}", app.mode());
    println!("final            {:.2} \u{00b0}C", app.temperature_c());
    println!("target           {:.1} \u{00b0}C", m.target_c);
    println!("overshoot        {:.2} \u{00b0}C ({:.1} %)", m.overshoot_c, m.overshoot_pct);
    println!("rise time        {}", fmt_secs(m.rise_time_secs));
    println!("settling time    {}", fmt_secs(m.settling_time_secs));
    println!("steady-state err {:+.3} \u{00b0}C", m.steady_state_error_c);
    println!("IAE              {:.2} \u{00b0}C\u{00b7}s", m.iae);
}
