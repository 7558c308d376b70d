//! Fixed-capacity history of recent samples for live graphing.
//!
//! Keeps the newest [`HISTORY_LEN`] samples (60 s at the default 0.5 s
//! tick). Older samples are overwritten; memory never grows.

use heapless::HistoryBuffer;

use crate::fsm::context::Sample;

/// Number of samples retained.
pub const HISTORY_LEN: usize = 120;

/// Ring buffer of the most recent samples.
pub struct History {
    buf: HistoryBuffer<Sample, HISTORY_LEN>,
}

impl History {
    pub fn new() -> Self {
        Self {
            buf: HistoryBuffer::new(),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.buf.write(sample);
    }

    pub fn clear(&mut self) {
        self.buf = HistoryBuffer::new();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.len() == 0
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.buf.oldest_ordered()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
