//! Error type shared by the compression and decompression streams.

use core::fmt;
use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while producing or consuming a stream.
///
/// Errors are reported once and never retried internally; after a stream
/// error the codec instance should be discarded. End-of-input on the
/// decompression side is *not* an error — it surfaces as a short read.
#[derive(Debug)]
pub enum Error {
    /// A configuration value is out of range: `window` outside `8..=15`,
    /// `literal` outside `5..=8`, or a supplied dictionary whose length is
    /// not `1 << window`.
    InvalidParameter,
    /// A literal byte does not fit in the configured number of literal bits.
    ExcessBits,
    /// The bit-stream violates the format (e.g. an impossible prefix code).
    MalformedStream,
    /// The stream header requests a capability this implementation does not
    /// provide (the variable-length header extension).
    NotImplemented,
    /// The stream header's dictionary flag disagrees with whether the caller
    /// supplied a dictionary buffer.
    DictionaryMismatch,
    /// The underlying byte source or sink failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter => write!(f, "parameter out of range"),
            Error::ExcessBits => write!(f, "literal value exceeds configured literal bits"),
            Error::MalformedStream => write!(f, "malformed bit-stream"),
            Error::NotImplemented => write!(f, "stream requires unsupported header extension"),
            Error::DictionaryMismatch => {
                write!(f, "stream dictionary flag disagrees with supplied dictionary")
            }
            Error::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
