//! CSV run-log adapter.
//!
//! Appends one row per simulation step to any [`Write`] target:
//!
//! ```text
//! tick,time_s,temperature_c,target_c,power,action
//! 1,0.500,18.225,22.0,0.5000,HEAT
//! ```
//!
//! `EventSink::emit` cannot fail, so the first I/O error is latched and
//! further writes are skipped; [`RunLogSink::finish`] reports it.

use std::io::{self, Write};

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::Result;
use crate::fsm::context::Sample;

const HEADER: &str = "tick,time_s,temperature_c,target_c,power,action";

pub struct RunLogSink<W: Write> {
    out: W,
    header_written: bool,
    rows: u64,
    error: Option<io::Error>,
}

impl<W: Write> RunLogSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
            rows: 0,
            error: None,
        }
    }

    /// Data rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the writer, or the first error seen.
    pub fn finish(mut self) -> Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_row(&mut self, s: &Sample) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "{HEADER}")?;
            self.header_written = true;
        }
        writeln!(
            self.out,
            "{},{:.3},{:.3},{:.1},{:.4},{}",
            s.tick,
            s.time_secs,
            s.temperature_c,
            s.target_c,
            s.power,
            s.action.as_str(),
        )
    }
}

impl<W: Write> EventSink for RunLogSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        let AppEvent::Sample(s) = event else {
            return;
        };
        if self.error.is_some() {
            return;
        }
        match self.write_row(s) {
            Ok(()) => self.rows += 1,
            Err(e) => {
                warn!("Run log write failed after {} rows: {e}", self.rows);
                self.error = Some(e);
            }
        }
    }
}
