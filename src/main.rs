//! Binary entry point for the `tamp` command-line tool.
//!
//! Argument parsing is delegated to clap; this file resolves the input and
//! output streams (files or stdio), drives the codec through `io::copy`, and
//! maps failures to a nonzero exit code with a message on stderr.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use tamp::cli::args::{Cli, Command, CompressArgs, DecompressArgs};
use tamp::cli::{set_display_level, CountingWriter};
use tamp::displaylevel;
use tamp::{Compressor, Decompressor, Options};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.quiet {
        set_display_level(1);
    } else {
        set_display_level(2 + u32::from(cli.verbose));
    }

    let result = match cli.command {
        Command::Compress(args) => run_compress(args),
        Command::Decompress(args) => run_decompress(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            displaylevel!(1, "tamp: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open input {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create output {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn run_compress(args: CompressArgs) -> anyhow::Result<()> {
    let options = Options {
        window: args.window,
        literal: args.literal,
        extended: args.extended,
    };
    displaylevel!(
        3,
        "compressing with window={} literal={} extended={}",
        options.window,
        options.literal,
        options.extended
    );

    let mut reader = BufReader::new(open_input(args.input.as_deref())?);
    let sink = CountingWriter::new(BufWriter::new(open_output(args.output.as_deref())?));
    let mut compressor =
        Compressor::new(sink, options).context("cannot start compression stream")?;

    let bytes_in = io::copy(&mut reader, &mut compressor).context("compression failed")?;
    let sink = compressor.close().context("compression failed")?;
    let bytes_out = sink.count();
    sink.into_inner().flush().context("cannot flush output")?;

    let ratio = if bytes_in > 0 {
        bytes_out as f64 / bytes_in as f64 * 100.0
    } else {
        100.0
    };
    displaylevel!(2, "{bytes_in} bytes in, {bytes_out} bytes out ({ratio:.2}%)");
    Ok(())
}

fn run_decompress(args: DecompressArgs) -> anyhow::Result<()> {
    let reader = BufReader::new(open_input(args.input.as_deref())?);
    let mut writer = BufWriter::new(open_output(args.output.as_deref())?);

    let mut decompressor = Decompressor::new(reader).context("cannot read stream header")?;
    let bytes_out = io::copy(&mut decompressor, &mut writer).context("decompression failed")?;
    writer.flush().context("cannot flush output")?;

    displaylevel!(2, "{bytes_out} bytes out");
    Ok(())
}
