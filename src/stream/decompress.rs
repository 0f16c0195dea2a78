//! Streaming decompressor.
//!
//! Construction parses the one-byte header; after that the stream is a
//! self-delimiting token sequence consumed one transactional read at a time.
//! Running out of input mid-token rolls the bit reader back and surfaces as
//! a short read, so callers can keep feeding a fragmented source and resume
//! exactly where decoding stopped. Back-references that expand past the
//! caller's buffer park their tail in an overflow carry that is served first
//! on the next call.

use std::io::{self, Read};

use crate::bitio::BitReader;
use crate::dictionary::{initialize_dictionary, Dict};
use crate::error::{Error, Result};
use crate::format::{
    compute_min_pattern_size, Header, EXTENDED_RAW_BITS, INDEX_EXTENDED_MATCH, INDEX_FLUSH,
    INDEX_RLE, RLE_COUNT_BIAS, RLE_RAW_BITS,
};
use crate::window::RingBuffer;

/// Decompresses a stream of encoded bytes read from `R`.
///
/// If the stream was compressed against a caller-supplied dictionary, the
/// same initialized buffer must be passed to
/// [`with_dictionary`](Decompressor::with_dictionary); it is borrowed
/// mutably for the decompressor's lifetime. Dropping a decompressor at any
/// point is safe.
#[derive(Debug)]
pub struct Decompressor<'d, R: Read> {
    bits: BitReader<R>,
    window: RingBuffer<'d>,
    window_bits: u8,
    literal_bits: u8,
    extended: bool,
    min_pattern_size: usize,
    overflow: Vec<u8>,
}

impl<'d, R: Read> Decompressor<'d, R> {
    /// Parse the header and set up a stream without an external dictionary.
    pub fn new(source: R) -> Result<Decompressor<'d, R>> {
        Self::build(source, None)
    }

    /// Parse the header and set up a stream over the caller's initialized
    /// dictionary. The stream must have been compressed with the same
    /// buffer content.
    pub fn with_dictionary(source: R, dictionary: &'d mut [u8]) -> Result<Decompressor<'d, R>> {
        Self::build(source, Some(dictionary))
    }

    fn build(source: R, dictionary: Option<&'d mut [u8]>) -> Result<Decompressor<'d, R>> {
        let mut bits = BitReader::new(source);
        let header = Header::decode(bits.read(8)? as u8)?;
        if header.uses_dictionary != dictionary.is_some() {
            return Err(Error::DictionaryMismatch);
        }
        let storage = match dictionary {
            Some(buffer) => {
                if buffer.len() != 1 << header.window {
                    return Err(Error::InvalidParameter);
                }
                Dict::Borrowed(buffer)
            }
            None => Dict::Owned(initialize_dictionary(1 << header.window)?.into_boxed_slice()),
        };
        let min_pattern_size = compute_min_pattern_size(header.window, header.literal)?;
        Ok(Decompressor {
            bits,
            window: RingBuffer::new(storage),
            window_bits: header.window,
            literal_bits: header.literal,
            extended: header.extended,
            min_pattern_size,
            overflow: Vec::new(),
        })
    }

    /// Decompress into `buf`, returning the number of bytes produced.
    ///
    /// A short count (including zero) means the source is exhausted for now;
    /// it is not an error, and a later call picks up where this one left
    /// off once the source has more bytes.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut written = self.drain_overflow(buf);

        while written < buf.len() {
            self.bits.begin();
            match self.read_token(buf, written) {
                Ok(produced) => {
                    self.bits.commit();
                    written += produced;
                }
                Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    self.bits.rollback();
                    break;
                }
                Err(other) => return Err(other),
            }
        }
        Ok(written)
    }

    /// Decompress everything remaining in the source.
    pub fn read_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let produced = self.read_into(&mut chunk)?;
            if produced == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..produced]);
        }
    }

    pub fn into_inner(self) -> R {
        self.bits.into_inner()
    }

    fn drain_overflow(&mut self, buf: &mut [u8]) -> usize {
        let count = self.overflow.len().min(buf.len());
        buf[..count].copy_from_slice(&self.overflow[..count]);
        self.overflow.drain(..count);
        count
    }

    /// Decode one token, materialize its bytes into the window, and deliver
    /// them to `buf[written..]` with any excess parked in the overflow.
    fn read_token(&mut self, buf: &mut [u8], written: usize) -> Result<usize> {
        let is_literal = self.bits.read(1)? == 1;
        if is_literal {
            let byte = self.bits.read(u32::from(self.literal_bits))? as u8;
            self.window.write_byte(byte);
            buf[written] = byte;
            return Ok(1);
        }

        let index = self.bits.read_huffman()?;
        if index == INDEX_FLUSH {
            // Alignment sentinel: the rest of the current byte is padding.
            self.bits.clear();
            return Ok(0);
        }

        if self.extended && index == INDEX_RLE {
            let count = self.read_extended_value(RLE_RAW_BITS)? + RLE_COUNT_BIAS;
            let byte = self.window.last_written_byte();
            self.window.write_run(byte, count.min(8));
            return Ok(self.deliver_run(byte, count, buf, written));
        }

        if self.extended && index == INDEX_EXTENDED_MATCH {
            let len = self.read_extended_value(EXTENDED_RAW_BITS)? + self.min_pattern_size + 12;
            let src = self.bits.read(u32::from(self.window_bits))? as usize;
            let bytes = self.window.get(src, len);
            // Output always receives the full match; the window write may be
            // truncated at its physical end.
            self.window.write_bytes_truncated(&bytes);
            return Ok(self.deliver(&bytes, buf, written));
        }

        // Plain match. Classic streams use the whole length table here.
        let len = index as usize + self.min_pattern_size;
        let src = self.bits.read(u32::from(self.window_bits))? as usize;
        let bytes = self.window.get(src, len);
        self.window.write_bytes(&bytes);
        Ok(self.deliver(&bytes, buf, written))
    }

    /// Read a prefix-coded value with `raw_bits` trailing raw bits, as used
    /// by run counts and extended match lengths.
    fn read_extended_value(&mut self, raw_bits: u8) -> Result<usize> {
        let prefix = self.bits.read_huffman()?;
        if prefix > 13 {
            // FLUSH cannot appear inside a length code.
            return Err(Error::MalformedStream);
        }
        let raw = self.bits.read(u32::from(raw_bits))? as usize;
        Ok(((prefix as usize) << raw_bits) | raw)
    }

    fn deliver(&mut self, bytes: &[u8], buf: &mut [u8], written: usize) -> usize {
        let fits = bytes.len().min(buf.len() - written);
        buf[written..written + fits].copy_from_slice(&bytes[..fits]);
        self.overflow.extend_from_slice(&bytes[fits..]);
        fits
    }

    fn deliver_run(&mut self, byte: u8, count: usize, buf: &mut [u8], written: usize) -> usize {
        let fits = count.min(buf.len() - written);
        buf[written..written + fits].fill(byte);
        self.overflow.resize(self.overflow.len() + (count - fits), byte);
        fits
    }
}

impl<R: Read> Read for Decompressor<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf).map_err(Into::into)
    }
}

/// Decompress a complete in-memory stream in one call.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    Decompressor::new(data)?.read_to_vec()
}

/// Decompress a complete in-memory stream against a caller-initialized
/// dictionary.
pub fn decompress_with_dictionary(data: &[u8], dictionary: &mut [u8]) -> Result<Vec<u8>> {
    Decompressor::with_dictionary(data, dictionary)?.read_to_vec()
}
