use std::fmt;
use std::io;
use thiserror::Error;

/// Which part of a record the decoder was reading when the input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Seconds,
    Micros,
    EventKind,
    Flags,
    KeyCode,
    Keys,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seconds => "seconds",
            Self::Micros => "microseconds",
            Self::EventKind => "event kind",
            Self::Flags => "modifier flags",
            Self::KeyCode => "key code",
            Self::Keys => "key text",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("stream ended inside the {field} field")]
    Truncated { field: RecordField },

    #[error("unknown event kind code {0}")]
    UnknownEventKind(u32),

    #[error("invalid UTF-8 in key text")]
    InvalidUtf8,

    #[error("read failed: {0}")]
    Io(io::ErrorKind),
}

/// Failure modes of [`crate::decoder::RecordDecoder`].
///
/// `EndOfInput` is the normal way a log ends and is not a failure for
/// callers; `MalformedRecord` is fatal, there is no resynchronization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("end of input")]
    EndOfInput,

    #[error("malformed record at byte {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: MalformedReason },
}

#[derive(Error, Debug)]
pub enum KeyTraceError {
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),

    #[error("Decode Error: {0}")]
    Decode(#[from] DecodeError),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type KtResult<T> = Result<T, KeyTraceError>;
