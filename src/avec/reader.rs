//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._
//!
//! A [`Reader`] polls a [`ByteSource`] one byte at a time. Sources are
//! expected to block for at most their configured read timeout; a poll which
//! times out yields no byte and is simply retried, so a quiet device never
//! ends a read. Only a failing or closed source does.

use std::io::{self, ErrorKind, Read};

use log::trace;
use thiserror::Error;

use crate::sans::{
    Decoder,
    typecast::{TypedRecord, typecast},
};

use super::RecordSink;

extern crate std;

/// Errors occurring while reading from a byte source.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied byte source.
    #[error(transparent)]
    Io(io::Error),
    /// The byte source reached the end of its stream.
    #[error("Byte source closed.")]
    Closed,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof => Self::Closed,
            _ => Self::Io(err),
        }
    }
}

/// A source of bytes with a read timeout, such as a serial port.
pub trait ByteSource {
    /// Read at most one byte, returning `None` if the read timed out.
    ///
    /// A source which has closed should return an error of kind
    /// [`ErrorKind::UnexpectedEof`].
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Discard bytes received but not yet read.
    fn discard_input(&mut self) -> io::Result<()>;
}

/// A byte source over any reader.
///
/// Reads returning [`ErrorKind::TimedOut`], [`ErrorKind::WouldBlock`] or
/// [`ErrorKind::Interrupted`] count as timeouts, and a read of zero bytes as
/// the end of the stream. Readers offer no way to discard pending input, so
/// [`ByteSource::discard_input`] does nothing; implement [`ByteSource`]
/// directly on a serial port type to support flushing.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0; 1];

        match self.inner.read(&mut buf) {
            Ok(0) => Err(ErrorKind::UnexpectedEof.into()),
            Ok(_) => Ok(Some(buf[0])),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn discard_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Decoder driven by a byte source.
///
/// Owns the parser for one connection; partially received frames carry over
/// between calls.
#[derive(Debug)]
pub struct Reader<S> {
    source: S,
    parser: Decoder,
}

impl<S: ByteSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: Decoder::new(),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Poll the source once, returning a record if the byte read completed
    /// one.
    pub fn poll(&mut self) -> Result<Option<TypedRecord>, Error> {
        let Some(byte) = self.source.read_byte()? else {
            return Ok(None);
        };

        Ok(self.parser.feed(byte).map(|raw| typecast(&raw)))
    }

    /// Block until a complete record is read, optionally discarding input
    /// already received.
    pub fn read_one(&mut self, flush: bool) -> Result<TypedRecord, Error> {
        if flush {
            self.source.discard_input()?;
        }

        loop {
            if let Some(record) = self.poll()? {
                return Ok(record);
            }
        }
    }

    /// Read a single record from fresh input, publishing it to a sink.
    pub fn read_one_callback(&mut self, o: &mut impl RecordSink) -> Result<(), Error> {
        let record = self.read_one(true)?;
        o.accept(record);
        Ok(())
    }

    /// Read records continuously, publishing each to a sink.
    ///
    /// Stops after `count` records, or runs until the source fails or closes
    /// when `count` is `None`. Returns the number of records published.
    pub fn read_many(
        &mut self,
        o: &mut impl RecordSink,
        count: Option<usize>,
    ) -> Result<usize, Error> {
        let mut n = 0;

        while count != Some(n) {
            if let Some(record) = self.poll()? {
                o.accept(record);
                n += 1;
                trace!("Published record {n}.");
            }
        }

        Ok(n)
    }

    /// Iterate over records as they are read.
    ///
    /// Iteration ends when the source closes; other source errors are
    /// yielded. Dropping the iterator keeps any partially read frame in the
    /// reader.
    pub fn records(&mut self) -> Records<'_, S> {
        Records { reader: self }
    }
}

/// Iterator over the records read by a [`Reader`].
#[derive(Debug)]
pub struct Records<'a, S> {
    reader: &'a mut Reader<S>,
}

impl<S: ByteSource> Iterator for Records<'_, S> {
    type Item = Result<TypedRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_one(false) {
            Err(Error::Closed) => None,
            r => Some(r),
        }
    }
}
