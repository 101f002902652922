use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use strum_macros::{Display, EnumIter};

/// Wire code of a key-down event.
pub const KEY_DOWN_CODE: u32 = 10;
/// Wire code of a key-up event.
pub const KEY_UP_CODE: u32 = 11;

/// Terminator of the key text on the wire. Not part of `Record::keys`.
pub const KEYS_TERMINATOR: char = '\n';

const MICROS_PER_SEC: i64 = 1_000_000;

/// Absolute time in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Combines the two wire fields. `micros` is not required to be below one
    /// second; it is added as-is.
    pub fn from_parts(secs: i64, micros: i32) -> Self {
        Self(
            secs.saturating_mul(MICROS_PER_SEC)
                .saturating_add(i64::from(micros)),
        )
    }

    pub fn as_micros(&self) -> i64 {
        self.0
    }

    pub fn secs(&self) -> i64 {
        self.0.div_euclid(MICROS_PER_SEC)
    }

    pub fn subsec_micros(&self) -> i32 {
        // rem_euclid of a positive modulus below i32::MAX fits
        self.0.rem_euclid(MICROS_PER_SEC) as i32
    }

    /// Signed distance `self - earlier` in microseconds.
    pub fn micros_since(&self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs(), self.subsec_micros())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    KeyDown,
    KeyUp,
    /// Placeholder for a record that was never filled in. The decoder never
    /// produces it: unknown codes are decode errors.
    #[default]
    Invalid,
}

impl EventKind {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            KEY_DOWN_CODE => Some(Self::KeyDown),
            KEY_UP_CODE => Some(Self::KeyUp),
            _ => None,
        }
    }

    /// `Invalid` encodes as 0, which no decoder accepts.
    pub fn code(&self) -> u32 {
        match self {
            Self::KeyDown => KEY_DOWN_CODE,
            Self::KeyUp => KEY_UP_CODE,
            Self::Invalid => 0,
        }
    }
}

/// One physical keyboard event as captured in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub timestamp: Timestamp,
    pub event_kind: EventKind,
    /// OS modifier bitmask, passed through uninterpreted.
    pub flags: u64,
    /// OS virtual key code, passed through uninterpreted.
    pub key_code: u16,
    pub keys: String,
}

impl Record {
    pub fn key_down(timestamp: Timestamp, keys: impl Into<String>) -> Self {
        Self {
            timestamp,
            event_kind: EventKind::KeyDown,
            keys: keys.into(),
            ..Default::default()
        }
    }

    pub fn key_up(timestamp: Timestamp, keys: impl Into<String>) -> Self {
        Self {
            timestamp,
            event_kind: EventKind::KeyUp,
            keys: keys.into(),
            ..Default::default()
        }
    }

    pub fn is_key_down(&self) -> bool {
        self.event_kind == EventKind::KeyDown
    }

    /// Writes the record in the log's wire format.
    ///
    /// `keys` must not contain the newline terminator, otherwise the output
    /// decodes as two records.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(26 + self.keys.len() + 1);
        out.extend_from_slice(&self.timestamp.secs().to_le_bytes());
        out.extend_from_slice(&self.timestamp.subsec_micros().to_le_bytes());
        out.extend_from_slice(&self.event_kind.code().to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.key_code.to_le_bytes());
        out.extend_from_slice(self.keys.as_bytes());
        let mut term = [0u8; 4];
        out.extend_from_slice(KEYS_TERMINATOR.encode_utf8(&mut term).as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_splits_negative_values_euclidean() {
        let t = Timestamp::from_micros(-1);
        assert_eq!(t.secs(), -1);
        assert_eq!(t.subsec_micros(), 999_999);
        assert_eq!(Timestamp::from_parts(t.secs(), t.subsec_micros()), t);
    }

    #[test]
    fn empty_record_is_header_plus_terminator() {
        let r = Record::key_down(Timestamp::from_parts(1, 2), "");
        assert_eq!(r.to_bytes().len(), 27);
    }

    #[test]
    fn writer_output_matches_to_bytes() {
        let r = Record::key_up(Timestamp::from_parts(3, 4), "⌘é");
        let mut out = Vec::new();
        r.write_to(&mut out).unwrap();
        assert_eq!(out, r.to_bytes());
        assert_eq!(out.len(), 26 + "⌘é".len() + 1);
    }
}
