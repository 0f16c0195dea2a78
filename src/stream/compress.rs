//! Streaming compressor.
//!
//! Input bytes accumulate in a 16-byte staging buffer; once it is full (or
//! on flush) the compressor runs emission steps, each consuming at least one
//! byte and producing at most one token. A step picks between four shapes:
//!
//! * a raw literal,
//! * a short match against the window (prefix code + window index),
//! * a run-length token for repeats of the last written byte (extended
//!   streams), and
//! * an extended match for patterns longer than the base length table
//!   (extended streams); these grow across steps and are emitted lazily.
//!
//! The window is only ever updated with bytes that have been emitted, so
//! the decompressor can mirror it exactly.

use std::io::{self, Write};

use crate::bitio::BitWriter;
use crate::dictionary::{initialize_dictionary, Dict};
use crate::error::{Error, Result};
use crate::format::{
    compute_min_pattern_size, max_pattern_size, rle_breakeven_point, Header, Options,
    EXTENDED_RAW_BITS, HUFFMAN_BITS, HUFFMAN_CODES, INDEX_EXTENDED_MATCH, INDEX_RLE,
    INPUT_BUFFER_SIZE, RLE_COUNT_BIAS, RLE_MAX_RUN, RLE_RAW_BITS,
};
use crate::window::RingBuffer;

/// Fixed-capacity FIFO of pending input bytes.
#[derive(Debug)]
struct InputBuffer {
    bytes: [u8; INPUT_BUFFER_SIZE],
    len: usize,
}

impl InputBuffer {
    fn new() -> Self {
        InputBuffer {
            bytes: [0; INPUT_BUFFER_SIZE],
            len: 0,
        }
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn len(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_full(&self) -> bool {
        self.len == INPUT_BUFFER_SIZE
    }

    fn push(&mut self, byte: u8) {
        debug_assert!(!self.is_full());
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn first(&self) -> Option<u8> {
        self.as_slice().first().copied()
    }

    /// Number of leading bytes equal to `byte`.
    fn leading_run(&self, byte: u8) -> usize {
        self.as_slice().iter().take_while(|&&b| b == byte).count()
    }

    fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.len);
        self.bytes.copy_within(count..self.len, 0);
        self.len -= count;
    }
}

/// An extended match currently being grown across steps.
#[derive(Debug, Clone, Copy)]
struct PendingMatch {
    index: usize,
    len: usize,
}

/// Compresses bytes written to it and forwards the encoded stream to `W`.
///
/// The window is owned unless the stream was opened with
/// [`with_dictionary`](Compressor::with_dictionary), in which case the
/// caller's buffer is borrowed mutably for the compressor's lifetime and the
/// same initialized buffer must be handed to the decompressor.
///
/// Dropping a compressor mid-stream loses staged input and residual bits; a
/// complete stream requires [`flush`](Compressor::flush) or
/// [`close`](Compressor::close).
#[derive(Debug)]
pub struct Compressor<'d, W: Write> {
    bits: BitWriter<W>,
    window: RingBuffer<'d>,
    staging: InputBuffer,
    window_bits: u8,
    literal_bits: u8,
    extended: bool,
    min_pattern_size: usize,
    max_pattern_size: usize,
    rle_breakeven: usize,
    /// Literal run accumulated against the last written byte, capped at
    /// [`RLE_MAX_RUN`]. Non-zero only between steps of the same run.
    rle_count: usize,
    pending: Option<PendingMatch>,
    cached: Option<PendingMatch>,
}

impl<'d, W: Write> Compressor<'d, W> {
    /// Open a stream with a freshly initialized window and write the header.
    pub fn new(sink: W, options: Options) -> Result<Compressor<'d, W>> {
        options.validate()?;
        let window = initialize_dictionary(1 << options.window)?;
        Self::build(sink, options, Dict::Owned(window.into_boxed_slice()), false)
    }

    /// Open a stream over a caller-initialized dictionary used in place.
    /// `dictionary.len()` must equal `1 << options.window`.
    pub fn with_dictionary(
        sink: W,
        options: Options,
        dictionary: &'d mut [u8],
    ) -> Result<Compressor<'d, W>> {
        options.validate()?;
        if dictionary.len() != 1 << options.window {
            return Err(Error::InvalidParameter);
        }
        Self::build(sink, options, Dict::Borrowed(dictionary), true)
    }

    fn build(
        sink: W,
        options: Options,
        storage: Dict<'d>,
        uses_dictionary: bool,
    ) -> Result<Compressor<'d, W>> {
        let min_pattern_size = compute_min_pattern_size(options.window, options.literal)?;
        let mut bits = BitWriter::new(sink);
        let header = Header {
            window: options.window,
            literal: options.literal,
            uses_dictionary,
            extended: options.extended,
        };
        bits.write(header.encode() as u32, 8)?;
        Ok(Compressor {
            bits,
            window: RingBuffer::new(storage),
            staging: InputBuffer::new(),
            window_bits: options.window,
            literal_bits: options.literal,
            extended: options.extended,
            min_pattern_size,
            max_pattern_size: max_pattern_size(min_pattern_size, options.extended),
            rle_breakeven: rle_breakeven_point(min_pattern_size, options.window),
            rle_count: 0,
            pending: None,
            cached: None,
        })
    }

    /// Compress `data` into the stream. Returns the number of encoded bytes
    /// handed to the sink by this call, which may be zero while input is
    /// still filling internal buffers.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut written = 0;
        for &byte in data {
            self.staging.push(byte);
            while self.staging.is_full() {
                written += self.step(false)?;
            }
        }
        Ok(written)
    }

    /// Drain the staging buffer and byte-align the output. With
    /// `write_token`, a FLUSH sentinel precedes the padding so the stream
    /// can keep going afterwards; without it the stream should be
    /// considered finished.
    pub fn flush(&mut self, write_token: bool) -> Result<usize> {
        let mut written = 0;
        self.cached = None;
        while !self.staging.is_empty() {
            written += self.step(true)?;
        }
        if let Some(pending) = self.pending.take() {
            written += self.emit_extended_match(pending)?;
        }
        if self.rle_count > 0 {
            let count = std::mem::take(&mut self.rle_count);
            written += self.emit_rle(count)?;
        }
        written += self.bits.flush(write_token)?;
        Ok(written)
    }

    /// Finish the stream (no sentinel) and return the sink.
    pub fn close(mut self) -> Result<W> {
        self.flush(false)?;
        Ok(self.bits.into_inner()?)
    }

    /// Run one emission step. Consumes at least one staged byte unless it
    /// only resolves carried state; callers loop until the staging buffer
    /// has room again.
    fn step(&mut self, flushing: bool) -> Result<usize> {
        if let Some(pending) = self.pending.take() {
            return self.continue_extended_match(pending, flushing);
        }

        // A match cached by the lazy-match heuristic is a committed decision:
        // it skips both run detection and the search.
        let cached = self.cached.take();

        if cached.is_none() && self.extended {
            if let Some(written) = self.try_rle(flushing)? {
                return Ok(written);
            }
        }

        let (index, len, fresh) = match cached {
            Some(cached) => (cached.index, cached.len, false),
            None => {
                let (index, len) = self.longest_match();
                (index, len, true)
            }
        };

        if len < self.min_pattern_size {
            return self.emit_literal();
        }

        // Lazy matching: a short match may hide a longer one starting a byte
        // later. When it does (and emitting a literal cannot corrupt the
        // alternative's source bytes), take the literal now and keep the
        // longer match for the next step. Deferring requires the first byte
        // to be expressible as a literal at all.
        if fresh
            && len <= 8
            && self.staging.len() >= len + 2
            && self.staging.as_slice()[0] >> self.literal_bits == 0
        {
            let (alt_index, alt_len) = self.longest_match_at(1);
            let cursor = self.window.pos();
            if alt_len > len && !(alt_index..alt_index + alt_len).contains(&cursor) {
                let written = self.emit_literal()?;
                self.cached = Some(PendingMatch {
                    index: alt_index,
                    len: alt_len,
                });
                return Ok(written);
            }
        }

        if self.extended && len > self.min_pattern_size + 11 {
            // Longer than the base table: start an extended match and let
            // subsequent steps grow it.
            self.pending = Some(PendingMatch { index, len });
            self.staging.consume(len);
            return Ok(0);
        }

        let mut written = self.bits.write_huffman(len - self.min_pattern_size)?;
        written += self
            .bits
            .write(index as u32, u32::from(self.window_bits))?;
        self.window.write_bytes(&self.staging.bytes[..len]);
        self.staging.consume(len);
        Ok(written)
    }

    /// Greedy longest-prefix search over the staged bytes.
    fn longest_match(&self) -> (usize, usize) {
        self.longest_match_at(0)
    }

    /// Greedy search starting `skip` bytes into the staging buffer. Each
    /// length extension resumes from the previous hit, which prunes the scan
    /// to a single forward pass.
    fn longest_match_at(&self, skip: usize) -> (usize, usize) {
        let buffer = &self.staging.as_slice()[skip..];
        let limit = buffer.len().min(self.max_pattern_size);
        let mut index = 0;
        let mut len = 0;
        for candidate in self.min_pattern_size..=limit {
            match self.window.find(&buffer[..candidate], index) {
                Some(found) => {
                    index = found;
                    len = candidate;
                }
                None => break,
            }
        }
        (index, len)
    }

    fn emit_literal(&mut self) -> Result<usize> {
        let byte = self.staging.as_slice()[0];
        if byte >> self.literal_bits != 0 {
            return Err(Error::ExcessBits);
        }
        let literal_flag = 1u32 << self.literal_bits;
        let written = self
            .bits
            .write(u32::from(byte) | literal_flag, u32::from(self.literal_bits) + 1)?;
        self.window.write_byte(byte);
        self.staging.consume(1);
        Ok(written)
    }

    /// Detect and encode runs of the last written byte. Returns `None` when
    /// the step should fall through to the normal match search.
    fn try_rle(&mut self, flushing: bool) -> Result<Option<usize>> {
        let last = self.window.last_written_byte();
        if self.rle_count == 0 && self.staging.first() != Some(last) {
            return Ok(None);
        }

        let run = self.staging.leading_run(last);
        let total = self.rle_count + run;

        if total >= RLE_MAX_RUN {
            // Emit a full token; the remainder of the run keeps accumulating
            // in later steps.
            self.staging.consume(RLE_MAX_RUN - self.rle_count);
            self.rle_count = 0;
            return self.emit_rle(RLE_MAX_RUN).map(Some);
        }

        if run == self.staging.len() && !flushing {
            // Run may continue into the next chunk of input.
            self.staging.consume(run);
            self.rle_count = total;
            return Ok(Some(0));
        }

        // The run ended inside the staging buffer (or we are flushing).
        // Once bytes have been consumed into the counter the token is
        // committed; otherwise short runs fall through to the match search.
        if total >= RLE_COUNT_BIAS && (self.rle_count > 0 || total >= self.rle_breakeven) {
            self.staging.consume(run);
            self.rle_count = 0;
            return self.emit_rle(total).map(Some);
        }
        Ok(None)
    }

    fn emit_rle(&mut self, count: usize) -> Result<usize> {
        debug_assert!((RLE_COUNT_BIAS..=RLE_MAX_RUN).contains(&count));
        let value = count - RLE_COUNT_BIAS;
        let prefix = value >> RLE_RAW_BITS;
        let mut written = self.bits.write_huffman(INDEX_RLE as usize)?;
        written += self.bits.write(
            u32::from(HUFFMAN_CODES[prefix]),
            u32::from(HUFFMAN_BITS[prefix]) - 1,
        )?;
        written += self.bits.write(
            (value & ((1 << RLE_RAW_BITS) - 1)) as u32,
            u32::from(RLE_RAW_BITS),
        )?;
        // The window takes at most 8 of the repeats, never past its
        // physical end. The decoder applies the same cap.
        let byte = self.window.last_written_byte();
        self.window.write_run(byte, count.min(8));
        Ok(written)
    }

    /// Grow an in-flight extended match byte by byte against the window.
    fn continue_extended_match(
        &mut self,
        mut pending: PendingMatch,
        flushing: bool,
    ) -> Result<usize> {
        loop {
            if pending.len == self.max_pattern_size
                || pending.index + pending.len == self.window.len()
            {
                return self.emit_extended_match(pending);
            }
            match self.staging.first() {
                None => {
                    if flushing {
                        return self.emit_extended_match(pending);
                    }
                    // Keep growing once more input arrives.
                    self.pending = Some(pending);
                    return Ok(0);
                }
                Some(byte) => {
                    if self.window.byte_at(pending.index + pending.len) == byte {
                        pending.len += 1;
                        self.staging.consume(1);
                    } else {
                        return self.emit_extended_match(pending);
                    }
                }
            }
        }
    }

    fn emit_extended_match(&mut self, pending: PendingMatch) -> Result<usize> {
        debug_assert!(pending.len >= self.min_pattern_size + 12);
        let value = pending.len - (self.min_pattern_size + 12);
        let prefix = value >> EXTENDED_RAW_BITS;
        let mut written = self.bits.write_huffman(INDEX_EXTENDED_MATCH as usize)?;
        written += self.bits.write(
            u32::from(HUFFMAN_CODES[prefix]),
            u32::from(HUFFMAN_BITS[prefix]) - 1,
        )?;
        written += self.bits.write(
            (value & ((1 << EXTENDED_RAW_BITS) - 1)) as u32,
            u32::from(EXTENDED_RAW_BITS),
        )?;
        written += self
            .bits
            .write(pending.index as u32, u32::from(self.window_bits))?;
        self.window.copy_from_self(pending.index, pending.len);
        Ok(written)
    }
}

impl<W: Write> Write for Compressor<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Compressor::write(self, buf)?;
        Ok(buf.len())
    }

    /// Byte-aligns with a FLUSH sentinel so the stream remains writable.
    fn flush(&mut self) -> io::Result<()> {
        Compressor::flush(self, true)?;
        Ok(())
    }
}

/// Compress `data` in one call with an owned, freshly initialized window.
pub fn compress(data: &[u8], options: Options) -> Result<Vec<u8>> {
    let mut compressor = Compressor::new(Vec::new(), options)?;
    compressor.write(data)?;
    compressor.close()
}

/// Compress `data` in one call against a caller-initialized dictionary.
pub fn compress_with_dictionary(
    data: &[u8],
    options: Options,
    dictionary: &mut [u8],
) -> Result<Vec<u8>> {
    let mut compressor = Compressor::with_dictionary(Vec::new(), options, dictionary)?;
    compressor.write(data)?;
    compressor.close()
}
