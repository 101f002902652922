use crate::record::{Record, Timestamp};
use tracing::warn;

/// Groups key-down text into typing sessions.
///
/// A gap strictly longer than the threshold between two consecutive key-down
/// records closes the current session. Key-up records are ignored.
#[derive(Debug)]
pub struct SessionSplitter {
    gap_micros: i64,
    buffer: String,
    last_key_down: Option<Timestamp>,
}

impl SessionSplitter {
    pub fn new(gap_ms: u64) -> Self {
        Self {
            gap_micros: i64::try_from(gap_ms.saturating_mul(1_000)).unwrap_or(i64::MAX),
            buffer: String::new(),
            last_key_down: None,
        }
    }

    /// Feeds one record. Returns the finished session when this record opens
    /// a new one.
    pub fn push(&mut self, record: &Record) -> Option<String> {
        if !record.is_key_down() {
            return None;
        }

        let mut finished = None;
        if let Some(prev) = self.last_key_down {
            let gap = record.timestamp.micros_since(prev);
            if gap < 0 {
                warn!(
                    "Clock went backwards at {} (previous key-down {})",
                    record.timestamp, prev
                );
            } else if gap > self.gap_micros && !self.buffer.is_empty() {
                finished = Some(std::mem::take(&mut self.buffer));
            }
        }

        self.buffer.push_str(&record.keys);
        self.last_key_down = Some(record.timestamp);
        finished
    }

    /// Ends input, returning the last session if it has any text.
    pub fn finish(&mut self) -> Option<String> {
        self.last_key_down = None;
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}
