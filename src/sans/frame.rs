//! The frame state machine.
//!
//! A frame looks like this on the wire:
//!
//! ```text
//! \r\n<key>\t<value>\r\n<key>\t<value> ... \r\nChecksum\t<byte>
//! ```

use alloc::{string::String, vec::Vec};
use core::{mem, str};

use log::{debug, trace, warn};
use thiserror::Error;

use super::check::{checksum_byte, compute_checksum};

const HEADER1: u8 = b'\r';
const HEADER2: u8 = b'\n';
const DELIMITER: u8 = b'\t';
const HEX_MARKER: u8 = b':';
const CHECKSUM_KEY: &[u8] = b"Checksum";

/// The text fields of one checksum-validated frame, in wire order.
///
/// Never holds the `Checksum` pseudo-field, which is consumed by the parser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord(Vec<(String, String)>);

impl RawRecord {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a field, returning the previous value if the key was already
    /// present. A repeated key keeps its original position.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(mem::replace(v, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl IntoIterator for RawRecord {
    type Item = (String, String);
    type IntoIter = alloc::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// An error decoding the text of a field.
#[derive(Debug, Error)]
pub enum FieldDecodeError {
    /// Key or value bytes were not valid UTF-8.
    #[error("Field bytes are not valid UTF-8: {0}.")]
    Utf8(#[from] str::Utf8Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    WaitHeader1,
    WaitHeader2,
    InKey,
    InValue,
    InChecksum,
    /// Skipping a hex protocol message until its closing line feed.
    Hex,
}

/// Byte-at-a-time frame decoder.
///
/// Holds the partially received frame, so use one parser per connection.
#[derive(Clone, Debug)]
pub struct FrameParser {
    state: State,
    key: Vec<u8>,
    value: Vec<u8>,
    sum: u8,
    record: RawRecord,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: State::WaitHeader1,
            key: Vec::new(),
            value: Vec::new(),
            sum: 0,
            record: RawRecord::new(),
        }
    }

    /// Advance the state machine by a single byte.
    ///
    /// Returns the frame's fields on the byte completing a frame with a valid
    /// checksum, and `None` otherwise. Frames failing their checksum are
    /// dropped without notice beyond a debug log.
    pub fn feed(&mut self, byte: u8) -> Option<RawRecord> {
        if byte == HEX_MARKER && self.state != State::InChecksum {
            if self.state != State::Hex {
                debug!("Skipping hex protocol message.");
                self.key.clear();
                self.value.clear();
            }
            self.state = State::Hex;
        }

        match self.state {
            State::WaitHeader1 => {
                if byte == HEADER1 {
                    self.accumulate(byte);
                    self.state = State::WaitHeader2;
                }
                None
            }
            State::WaitHeader2 => {
                if byte == HEADER2 {
                    self.accumulate(byte);
                    self.state = State::InKey;
                }
                None
            }
            State::InKey => {
                self.accumulate(byte);
                if byte == DELIMITER {
                    self.state = if self.key == CHECKSUM_KEY {
                        State::InChecksum
                    } else {
                        State::InValue
                    };
                } else {
                    self.key.push(byte);
                }
                None
            }
            State::InValue => {
                self.accumulate(byte);
                if byte == HEADER1 {
                    self.state = State::WaitHeader2;
                    self.finish_field();
                } else {
                    self.value.push(byte);
                }
                None
            }
            State::InChecksum => {
                self.accumulate(byte);
                self.key.clear();
                self.value.clear();
                self.state = State::WaitHeader1;

                let sum = mem::take(&mut self.sum);
                let record = mem::take(&mut self.record);

                if sum == 0 {
                    trace!("Received frame of {} fields.", record.len());
                    Some(record)
                } else {
                    debug!(
                        "Dropping frame of {} fields with checksum remainder {sum:#04x}.",
                        record.len()
                    );
                    None
                }
            }
            State::Hex => {
                self.sum = 0;
                if byte == HEADER2 {
                    self.state = State::WaitHeader1;
                }
                None
            }
        }
    }

    fn accumulate(&mut self, byte: u8) {
        self.sum = compute_checksum(self.sum, &[byte]);
    }

    /// Move the buffered key and value into the record, clearing both buffers.
    fn finish_field(&mut self) {
        match decode_field(&self.key, &self.value) {
            Ok((key, value)) => {
                self.record.insert(key, value);
            }
            Err(err) => warn!(
                "Dropping field with key {:?} and value {:?}: {err}",
                self.key, self.value
            ),
        }

        self.key.clear();
        self.value.clear();
    }
}

fn decode_field(key: &[u8], value: &[u8]) -> Result<(String, String), FieldDecodeError> {
    let key = str::from_utf8(key)?;
    let value = str::from_utf8(value)?;
    Ok((key.into(), value.into()))
}

/// Encode fields into a complete frame, closed by a valid checksum.
///
/// Keys and values must not contain control characters or a colon, which
/// would be read back as a hex protocol message.
pub fn encode<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<u8> {
    let mut r = Vec::new();

    for (key, value) in fields {
        r.extend_from_slice(&[HEADER1, HEADER2]);
        r.extend_from_slice(key.as_bytes());
        r.push(DELIMITER);
        r.extend_from_slice(value.as_bytes());
    }

    r.extend_from_slice(&[HEADER1, HEADER2]);
    r.extend_from_slice(CHECKSUM_KEY);
    r.push(DELIMITER);
    r.push(checksum_byte(&r));

    r
}
