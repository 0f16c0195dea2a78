//! Streaming compression and decompression over `std::io` byte streams.

pub mod compress;
pub mod decompress;

pub use compress::{compress, compress_with_dictionary, Compressor};
pub use decompress::{decompress, decompress_with_dictionary, Decompressor};
