use crate::error::{DecodeError, MalformedReason, RecordField};
use crate::record::{EventKind, Record, Timestamp, KEYS_TERMINATOR};
use std::io::{self, Read};

enum ReadFailure {
    /// Input ended after `read` bytes of the requested buffer.
    Eof { read: usize },
    Io(io::ErrorKind),
}

impl ReadFailure {
    fn into_reason(self, field: RecordField) -> MalformedReason {
        match self {
            Self::Eof { .. } => MalformedReason::Truncated { field },
            Self::Io(kind) => MalformedReason::Io(kind),
        }
    }
}

/// Pulls [`Record`]s out of a raw key log.
///
/// Reads are issued directly against `R`; wrap files in a `BufReader`.
pub struct RecordDecoder<R> {
    inner: R,
    offset: u64,
    finished: bool,
}

impl<R: Read> RecordDecoder<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            finished: false,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decodes the next record.
    ///
    /// Returns `EndOfInput` only when the stream is exhausted exactly at a
    /// record boundary. Any other shortfall is `MalformedRecord`.
    pub fn next_record(&mut self) -> Result<Record, DecodeError> {
        let start = self.offset;

        let mut secs = [0u8; 8];
        match self.fill(&mut secs) {
            Ok(()) => {}
            Err(ReadFailure::Eof { read: 0 }) => return Err(DecodeError::EndOfInput),
            Err(failure) => {
                return Err(malformed(start, failure.into_reason(RecordField::Seconds)))
            }
        }
        let secs = i64::from_le_bytes(secs);
        let micros = i32::from_le_bytes(self.read_field(start, RecordField::Micros)?);

        let code = u32::from_le_bytes(self.read_field(start, RecordField::EventKind)?);
        let event_kind = EventKind::from_code(code)
            .ok_or_else(|| malformed(start, MalformedReason::UnknownEventKind(code)))?;

        let flags = u64::from_le_bytes(self.read_field(start, RecordField::Flags)?);
        let key_code = u16::from_le_bytes(self.read_field(start, RecordField::KeyCode)?);
        let keys = self.read_keys(start)?;

        Ok(Record {
            timestamp: Timestamp::from_parts(secs, micros),
            event_kind,
            flags,
            key_code,
            keys,
        })
    }

    fn read_field<const N: usize>(
        &mut self,
        start: u64,
        field: RecordField,
    ) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)
            .map_err(|failure| malformed(start, failure.into_reason(field)))?;
        Ok(buf)
    }

    /// Reads scalar values until the terminator. The terminator is consumed
    /// but not returned.
    fn read_keys(&mut self, start: u64) -> Result<String, DecodeError> {
        let mut keys = String::new();
        loop {
            let ch = self.read_char(start)?;
            if ch == KEYS_TERMINATOR {
                return Ok(keys);
            }
            keys.push(ch);
        }
    }

    fn read_char(&mut self, start: u64) -> Result<char, DecodeError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf[..1])
            .map_err(|failure| malformed(start, failure.into_reason(RecordField::Keys)))?;

        let width = utf8_width(buf[0])
            .ok_or_else(|| malformed(start, MalformedReason::InvalidUtf8))?;
        if width > 1 {
            self.fill(&mut buf[1..width])
                .map_err(|failure| malformed(start, failure.into_reason(RecordField::Keys)))?;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| malformed(start, MalformedReason::InvalidUtf8))
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), ReadFailure> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(ReadFailure::Eof { read: filled }),
                Ok(n) => {
                    filled += n;
                    self.offset += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReadFailure::Io(e.kind())),
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for RecordDecoder<R> {
    type Item = Result<Record, DecodeError>;

    /// Ends quietly at `EndOfInput`; a malformed record is yielded once and
    /// then the iterator is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_record() {
            Ok(record) => Some(Ok(record)),
            Err(DecodeError::EndOfInput) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn malformed(offset: u64, reason: MalformedReason) -> DecodeError {
    DecodeError::MalformedRecord { offset, reason }
}

/// Encoded length implied by a UTF-8 lead byte, `None` for bytes that can
/// never start a scalar value.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn width_rejects_continuation_and_overlong_leads() {
        assert_eq!(utf8_width(b'a'), Some(1));
        assert_eq!(utf8_width(0x80), None);
        assert_eq!(utf8_width(0xC0), None);
        assert_eq!(utf8_width(0xF5), None);
        assert_eq!(utf8_width(0xE2), Some(3));
    }

    #[test]
    fn offset_tracks_consumed_bytes() {
        let bytes = Record::key_down(Timestamp::from_parts(5, 0), "ab").to_bytes();
        let len = bytes.len() as u64;
        let mut dec = RecordDecoder::new(Cursor::new(bytes));
        dec.next_record().unwrap();
        assert_eq!(dec.offset(), len);
        assert_eq!(dec.next_record(), Err(DecodeError::EndOfInput));
    }

    #[test]
    fn surrogate_encoding_is_invalid_utf8() {
        let mut bytes = Record::key_down(Timestamp::default(), "").to_bytes();
        bytes.pop();
        // U+D800 encoded as if it were a scalar value
        bytes.extend_from_slice(&[0xED, 0xA0, 0x80, b'\n']);
        let mut dec = RecordDecoder::new(Cursor::new(bytes));
        assert_eq!(
            dec.next_record(),
            Err(DecodeError::MalformedRecord {
                offset: 0,
                reason: MalformedReason::InvalidUtf8
            })
        );
    }
}
