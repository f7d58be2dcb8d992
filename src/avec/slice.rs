//! Slice-based decoder implementation.

use core::slice;

use crate::sans::{
    Decoder,
    typecast::{TypedRecord, typecast},
};

use super::RecordSink;

/// Decode records from a slice of a captured byte stream, publishing to a
/// sink.
///
/// Returns the number of records published. Bytes after the last complete
/// frame are ignored.
///
/// This method is also re-exported as `vedirect::avec::decode_slice`.
pub fn decode(r: &[u8], o: &mut impl RecordSink) -> usize {
    let mut count = 0;

    for record in Records::new(r) {
        o.accept(record);
        count += 1;
    }

    count
}

/// Iterator over the records in a slice of a byte stream.
#[derive(Debug)]
pub struct Records<'a> {
    r: slice::Iter<'a, u8>,
    parser: Decoder,
}

impl<'a> Records<'a> {
    pub fn new(r: &'a [u8]) -> Self {
        Self {
            r: r.iter(),
            parser: Decoder::new(),
        }
    }
}

impl Iterator for Records<'_> {
    type Item = TypedRecord;

    fn next(&mut self) -> Option<TypedRecord> {
        let raw = self.r.by_ref().find_map(|b| self.parser.feed(*b))?;
        Some(typecast(&raw))
    }
}
