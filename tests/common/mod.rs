#![allow(dead_code)]

use keytrace::record::{Record, Timestamp};
use std::io::Write;
use tempfile::NamedTempFile;

/// Key-down record at `ms` milliseconds after the epoch.
pub fn down(ms: i64, keys: &str) -> Record {
    Record::key_down(Timestamp::from_micros(ms * 1_000), keys)
}

pub fn up(ms: i64, keys: &str) -> Record {
    Record::key_up(Timestamp::from_micros(ms * 1_000), keys)
}

pub fn encode(records: &[Record]) -> Vec<u8> {
    records.iter().flat_map(|r| r.to_bytes()).collect()
}

/// Key-downs for `text`, one character per record, `step_ms` apart.
pub fn typed(start_ms: i64, step_ms: i64, text: &str) -> Vec<Record> {
    text.chars()
        .enumerate()
        .map(|(i, c)| down(start_ms + i as i64 * step_ms, &c.to_string()))
        .collect()
}

pub fn write_log(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp log");
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
