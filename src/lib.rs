//! Tamp — low-memory LZ-style streaming compression.
//!
//! Tamp trades a little ratio for a very small, fully deterministic memory
//! footprint: a sliding window of 256 bytes to 32 KiB, a 16-byte staging
//! buffer, and a pair of bit registers. Compression and decompression are
//! symmetric stream transformers over [`std::io::Write`] /
//! [`std::io::Read`], and the format is bit-exact across implementations.
//!
//! # One-shot
//!
//! ```
//! use tamp::{compress, decompress, Options};
//!
//! let encoded = compress(b"the quick brown fox", Options::default()).unwrap();
//! let decoded = decompress(&encoded).unwrap();
//! assert_eq!(decoded, b"the quick brown fox");
//! ```
//!
//! # Streaming
//!
//! ```
//! use std::io::Read;
//! use tamp::{Compressor, Decompressor, Options};
//!
//! let mut compressor = Compressor::new(Vec::new(), Options::default()).unwrap();
//! compressor.write(b"streamed ").unwrap();
//! compressor.write(b"in pieces").unwrap();
//! let encoded = compressor.close().unwrap();
//!
//! let mut decoded = Vec::new();
//! Decompressor::new(encoded.as_slice())
//!     .unwrap()
//!     .read_to_end(&mut decoded)
//!     .unwrap();
//! assert_eq!(decoded, b"streamed in pieces");
//! ```

pub mod bitio;
pub mod cli;
pub mod dictionary;
pub mod error;
pub mod format;
pub mod stream;
pub mod window;

/// Streaming compressor over a byte sink.
pub use stream::compress::Compressor;
/// Streaming decompressor over a byte source.
pub use stream::decompress::Decompressor;

/// One-shot in-memory compression.
pub use stream::compress::{compress, compress_with_dictionary};
/// One-shot in-memory decompression.
pub use stream::decompress::{decompress, decompress_with_dictionary};

/// Stream configuration (window bits, literal bits, extended tokens).
pub use format::Options;

/// Derived minimum match length for a window/literal configuration.
pub use format::compute_min_pattern_size;

/// Deterministic window initialization shared by both stream directions.
pub use dictionary::{initialize_dictionary, initialize_dictionary_with_seed};

/// Crate-wide error and result types.
pub use error::{Error, Result};
