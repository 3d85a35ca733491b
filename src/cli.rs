//! Implementation of the CLI application.

use std::error::Error;

use clap::Parser;

pub mod decode;
pub mod encode;
pub mod expand;

/// Trait to run a CLI subcommand.
pub trait Run {
    /// Run the CLI subcommand.
    fn run(&self) -> Result<(), Box<dyn Error>>;
}

/// CLI options.
#[derive(Debug, Parser)]
#[command(name = "qc-ldpc-codec", about = "Quasi-cyclic LDPC encoder/decoder")]
pub enum Opt {
    /// Encode a message into a codeword
    Encode(encode::Args),
    /// Decode a received word
    Decode(decode::Args),
    /// Expand a shift-matrix dump into an alist parity check matrix
    Expand(expand::Args),
}

impl Run for Opt {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Opt::Encode(x) => x.run(),
            Opt::Decode(x) => x.run(),
            Opt::Expand(x) => x.run(),
        }
    }
}
