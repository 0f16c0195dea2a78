//! Bit-stream format constants and derived parameters.
//!
//! A stream is a single header byte followed by a self-delimiting token
//! sequence, most-significant-bit first. Every token starts with a one-bit
//! literal flag; non-literal tokens continue with one of the prefix codes
//! below. Indices `0..=13` select a pattern length in classic streams, while
//! extended streams reserve index 12 for run-length tokens and index 13 for
//! matches longer than the base table can express. Index 14 is the FLUSH
//! sentinel that byte-aligns the stream without carrying data.

use crate::error::{Error, Result};

/// Prefix codes for pattern-length indices `0..=13`. The leading `0` literal
/// flag is folded into the code, so these are written in one piece.
pub const HUFFMAN_CODES: [u8; 14] = [
    0x00, 0x03, 0x08, 0x0B, 0x14, 0x24, 0x26, 0x2B, 0x4B, 0x54, 0x94, 0x95, 0xAA, 0x27,
];

/// Bit lengths for [`HUFFMAN_CODES`], including the folded literal flag.
pub const HUFFMAN_BITS: [u8; 14] = [2, 3, 5, 5, 6, 7, 7, 7, 8, 8, 9, 9, 9, 7];

/// FLUSH sentinel code, written with [`FLUSH_CODE_BITS`] bits (flag folded).
pub const FLUSH_CODE: u16 = 0xAB;
pub const FLUSH_CODE_BITS: u8 = 9;

/// Prefix-table index of the run-length token (extended streams only).
pub const INDEX_RLE: u8 = 12;
/// Prefix-table index of the extended-match token (extended streams only).
pub const INDEX_EXTENDED_MATCH: u8 = 13;
/// Prefix-table index decoded for the FLUSH sentinel.
pub const INDEX_FLUSH: u8 = 14;

/// Capacity of the compressor's input staging buffer.
pub const INPUT_BUFFER_SIZE: usize = 16;

/// Raw trailing bits in a run-length count code.
pub const RLE_RAW_BITS: u8 = 4;
/// Raw trailing bits in an extended-match length code.
pub const EXTENDED_RAW_BITS: u8 = 3;

/// Largest run a single RLE token can carry.
pub const RLE_MAX_RUN: usize = (13 << RLE_RAW_BITS) + (1 << RLE_RAW_BITS) + 1;

/// Run-length counts are stored biased by this amount.
pub const RLE_COUNT_BIAS: usize = 2;

/// Stream parameters fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Window size in bits; the dictionary holds `1 << window` bytes.
    pub window: u8,
    /// Payload bits per raw literal.
    pub literal: u8,
    /// Enable run-length and extended-match tokens.
    pub extended: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            window: 10,
            literal: 8,
            extended: false,
        }
    }
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        if !(8..=15).contains(&self.window) || !(5..=8).contains(&self.literal) {
            return Err(Error::InvalidParameter);
        }
        Ok(())
    }
}

/// Decoded form of the single header byte (`wwwLLdxm`, MSb first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub window: u8,
    pub literal: u8,
    pub uses_dictionary: bool,
    pub extended: bool,
}

impl Header {
    pub fn encode(&self) -> u8 {
        ((self.window - 8) << 5)
            | ((self.literal - 5) << 3)
            | ((self.uses_dictionary as u8) << 2)
            | ((self.extended as u8) << 1)
    }

    /// Parse a header byte. The trailing "more header bytes" bit is reserved
    /// for future stream revisions and rejected here.
    pub fn decode(byte: u8) -> Result<Header> {
        if byte & 0x01 != 0 {
            return Err(Error::NotImplemented);
        }
        Ok(Header {
            window: (byte >> 5) + 8,
            literal: ((byte >> 3) & 0x03) + 5,
            uses_dictionary: byte & 0x04 != 0,
            extended: byte & 0x02 != 0,
        })
    }
}

/// Smallest pattern length worth encoding as a match for the given window
/// and literal widths. Two-byte matches stop paying for themselves once the
/// window index grows past the cost of the literals they replace.
pub fn compute_min_pattern_size(window: u8, literal: u8) -> Result<usize> {
    Options {
        window,
        literal,
        extended: false,
    }
    .validate()?;
    Ok(2 + usize::from(window > 10 + ((literal - 5) << 1)))
}

/// Largest pattern length a stream can express.
pub fn max_pattern_size(min_pattern_size: usize, extended: bool) -> usize {
    if extended {
        min_pattern_size + 11 + (13 << EXTENDED_RAW_BITS) + (1 << EXTENDED_RAW_BITS)
    } else {
        min_pattern_size + 13
    }
}

/// Shortest run for which a run-length token costs no more than encoding the
/// same bytes as a single short match. Runs of at most 17 fit the cheapest
/// count code, so the RLE side of the comparison is constant.
pub fn rle_breakeven_point(min_pattern_size: usize, window: u8) -> usize {
    let rle_cost = HUFFMAN_BITS[INDEX_RLE as usize] as usize
        + (HUFFMAN_BITS[0] - 1) as usize
        + RLE_RAW_BITS as usize;
    for len in min_pattern_size..=min_pattern_size + 11 {
        let match_cost = HUFFMAN_BITS[len - min_pattern_size] as usize + window as usize;
        if match_cost >= rle_cost {
            return len;
        }
    }
    min_pattern_size + 12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_pattern_size_boundaries() {
        assert_eq!(compute_min_pattern_size(10, 8).unwrap(), 2);
        assert_eq!(compute_min_pattern_size(8, 5).unwrap(), 2);
        assert_eq!(compute_min_pattern_size(11, 5).unwrap(), 3);
        assert_eq!(compute_min_pattern_size(14, 7).unwrap(), 2);
        assert_eq!(compute_min_pattern_size(15, 8).unwrap(), 3);
        assert!(compute_min_pattern_size(7, 8).is_err());
        assert!(compute_min_pattern_size(16, 8).is_err());
        assert!(compute_min_pattern_size(10, 4).is_err());
        assert!(compute_min_pattern_size(10, 9).is_err());
    }

    #[test]
    fn header_round_trip() {
        for window in 8..=15 {
            for literal in 5..=8 {
                for (uses_dictionary, extended) in
                    [(false, false), (true, false), (false, true), (true, true)]
                {
                    let header = Header {
                        window,
                        literal,
                        uses_dictionary,
                        extended,
                    };
                    assert_eq!(Header::decode(header.encode()).unwrap(), header);
                }
            }
        }
    }

    #[test]
    fn header_rejects_extension_bit() {
        assert!(matches!(Header::decode(0x01), Err(Error::NotImplemented)));
    }

    #[test]
    fn rle_breakeven_tracks_window_cost() {
        // Wide windows make matches expensive, so runs break even sooner.
        assert_eq!(rle_breakeven_point(2, 8), 6);
        assert_eq!(rle_breakeven_point(2, 10), 4);
        assert_eq!(rle_breakeven_point(3, 15), 3);
    }

    #[test]
    fn rle_max_run_is_reachable_by_the_count_code() {
        // Biased count 223 = (13 << 4) | 15, the largest encodable value.
        assert_eq!(RLE_MAX_RUN - RLE_COUNT_BIAS, (13 << RLE_RAW_BITS) | 0x0F);
    }
}
