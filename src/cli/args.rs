//! clap definitions for the `tamp` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tamp", version, about = "Compress and decompress data in Tamp format")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print more progress detail (repeatable).
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress an input file or stream.
    Compress(CompressArgs),
    /// Decompress an input file or stream.
    Decompress(DecompressArgs),
}

#[derive(Debug, Args)]
pub struct CompressArgs {
    /// Input file; standard input when omitted.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output file; standard output when omitted.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Window size in bits (dictionary of 2^WINDOW bytes).
    #[arg(short = 'w', long, default_value_t = 10,
          value_parser = clap::value_parser!(u8).range(8..=15))]
    pub window: u8,

    /// Literal size in bits.
    #[arg(short = 'l', long, default_value_t = 8,
          value_parser = clap::value_parser!(u8).range(5..=8))]
    pub literal: u8,

    /// Enable run-length and extended-match tokens.
    #[arg(short = 'x', long)]
    pub extended: bool,
}

#[derive(Debug, Args)]
pub struct DecompressArgs {
    /// Input file; standard input when omitted.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output file; standard output when omitted.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
