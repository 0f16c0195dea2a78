// End-to-end properties: every stream must decode back to its plaintext for
// all parameter combinations, independent of how the input was chunked on
// either side.

use std::io::Read;

use tamp::dictionary::Xorshift32;
use tamp::{compress, decompress, Compressor, Decompressor, Options};

const TALE: &[u8] = b"It was the best of times, it was the worst of times, it was the age \
of wisdom, it was the age of foolishness, it was the epoch of belief, it was the epoch of \
incredulity, it was the season of Light, it was the season of Darkness, it was the spring \
of hope, it was the winter of despair, we had everything before us, we had nothing before \
us, we were all going direct to Heaven, we were all going direct the other way - in short, \
the period was so far like the present period, that some of its noisiest authorities \
insisted on its being received, for good or for evil, in the superlative degree of \
comparison only.";

/// Deterministic noise with every byte below `1 << bits`.
fn pseudo_bytes(len: usize, bits: u8, seed: u32) -> Vec<u8> {
    let mut rng = Xorshift32::new(seed);
    (0..len)
        .map(|_| (rng.next_u32() & ((1u32 << bits) - 1)) as u8)
        .collect()
}

fn assert_round_trip(data: &[u8], options: Options) {
    let encoded = compress(data, options).unwrap();
    let decoded = decompress(&encoded).unwrap();
    assert_eq!(
        decoded, data,
        "round trip failed for window={} literal={} extended={}",
        options.window, options.literal, options.extended
    );
}

#[test]
fn random_data_all_parameter_combinations() {
    let mut seed: u32 = 0x9E37_79B9;
    for literal in 5..=8u8 {
        for window in [8u8, 10, 15] {
            for extended in [false, true] {
                seed = seed.wrapping_add(0x6D2B_79F5);
                let data = pseudo_bytes(10_000, literal, seed);
                assert_round_trip(
                    &data,
                    Options {
                        window,
                        literal,
                        extended,
                    },
                );
            }
        }
    }
}

#[test]
fn sequential_data() {
    let data = vec![1u8; 10_000];
    for extended in [false, true] {
        assert_round_trip(
            &data,
            Options {
                extended,
                ..Options::default()
            },
        );
    }
}

#[test]
fn text_with_a_small_window() {
    assert!(TALE.len() > 1 << 8);
    for window in [8u8, 10] {
        for extended in [false, true] {
            assert_round_trip(
                TALE,
                Options {
                    window,
                    literal: 8,
                    extended,
                },
            );
        }
    }
}

#[test]
fn repeated_pattern_uses_extended_matches_well() {
    let data: Vec<u8> = b"tamp".repeat(1024);
    let classic = compress(
        &data,
        Options {
            extended: false,
            ..Options::default()
        },
    )
    .unwrap();
    let extended = compress(
        &data,
        Options {
            extended: true,
            ..Options::default()
        },
    )
    .unwrap();

    assert_eq!(decompress(&classic).unwrap(), data);
    assert_eq!(decompress(&extended).unwrap(), data);
    // Extended matches cover up to ~8x more bytes per token.
    assert!(extended.len() < classic.len() / 2);
}

#[test]
fn long_run_compresses_to_a_handful_of_tokens() {
    let data = vec![b'X'; 2000];
    let encoded = compress(
        &data,
        Options {
            extended: true,
            ..Options::default()
        },
    )
    .unwrap();
    assert_eq!(decompress(&encoded).unwrap(), data);

    // One literal plus ceil(1999 / 225) run tokens of at most four bytes
    // each; anything bigger means runs are being split needlessly.
    assert!(
        encoded.len() <= 40,
        "run-heavy stream grew to {} bytes",
        encoded.len()
    );
}

#[test]
fn runs_trailing_mixed_content() {
    let cases: [&[u8]; 3] = [
        b"Hello World!\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0",
        b"ABCDZZZZ",
        b"ABCD",
    ];
    for data in cases {
        for window in [8u8, 10, 15] {
            assert_round_trip(
                data,
                Options {
                    window,
                    literal: 8,
                    extended: true,
                },
            );
        }
    }
}

#[test]
fn compressor_chunking_does_not_change_the_stream() {
    let data: Vec<u8> = TALE.repeat(3);
    for extended in [false, true] {
        let options = Options {
            extended,
            ..Options::default()
        };
        let whole = compress(&data, options).unwrap();

        let mut compressor = Compressor::new(Vec::new(), options).unwrap();
        let mut offset = 0;
        let mut chunk = 1;
        while offset < data.len() {
            let end = (offset + chunk).min(data.len());
            compressor.write(&data[offset..end]).unwrap();
            offset = end;
            chunk = chunk % 13 + 1;
        }
        assert_eq!(compressor.close().unwrap(), whole);
    }
}

#[test]
fn decompressor_output_chunking_is_transparent() {
    let data = pseudo_bytes(4096, 8, 0xABCD_EF01);
    let encoded = compress(
        &data,
        Options {
            extended: true,
            ..Options::default()
        },
    )
    .unwrap();

    let mut decompressor = Decompressor::new(encoded.as_slice()).unwrap();
    let mut decoded = Vec::new();
    let mut buf = [0u8; 3];
    loop {
        let produced = decompressor.read_into(&mut buf).unwrap();
        if produced == 0 {
            break;
        }
        decoded.extend_from_slice(&buf[..produced]);
    }
    assert_eq!(decoded, data);
}

#[test]
fn mid_stream_flushes_preserve_extended_state() {
    // A flush lands while an extended match is growing and, separately,
    // while a run is being carried; both must be finalized and the stream
    // must keep decoding afterwards.
    let options = Options {
        extended: true,
        ..Options::default()
    };

    let mut compressor = Compressor::new(Vec::new(), options).unwrap();
    compressor.write(&b"pattern!".repeat(8)).unwrap();
    compressor.flush(true).unwrap();
    compressor.write(&b"pattern!".repeat(8)).unwrap();
    compressor.flush(true).unwrap();
    compressor.write(&vec![b'R'; 33]).unwrap();
    let encoded = compressor.close().unwrap();

    let mut expected = b"pattern!".repeat(16);
    expected.extend_from_slice(&vec![b'R'; 33]);
    assert_eq!(decompress(&encoded).unwrap(), expected);
}

#[test]
fn flush_after_every_byte_still_decodes() {
    let mut compressor = Compressor::new(Vec::new(), Options::default()).unwrap();
    for &byte in b"abcdef" {
        compressor.write(&[byte]).unwrap();
        compressor.flush(true).unwrap();
    }
    let encoded = compressor.close().unwrap();
    assert_eq!(decompress(&encoded).unwrap(), b"abcdef");
}

#[test]
fn io_traits_compose_with_std() {
    use std::io::Write;

    let mut compressor = Compressor::new(Vec::new(), Options::default()).unwrap();
    std::io::copy(&mut &TALE[..], &mut compressor).unwrap();
    Write::flush(&mut compressor).unwrap();
    let encoded = compressor.close().unwrap();

    let mut decoded = Vec::new();
    Decompressor::new(encoded.as_slice())
        .unwrap()
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, TALE);
}

#[test]
fn low_bit_literals_round_trip_exactly() {
    // Long stretches of small values exercise literal encoding at every
    // narrow width.
    for literal in 5..=7u8 {
        let data: Vec<u8> = (0..977u32).map(|i| (i % (1 << literal)) as u8).collect();
        for extended in [false, true] {
            assert_round_trip(
                &data,
                Options {
                    window: 10,
                    literal,
                    extended,
                },
            );
        }
    }
}
