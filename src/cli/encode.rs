//! Encode CLI subcommand.
//!
//! Performs systematic encoding using the double-diagonal back-substitution
//! encoder.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::Run;
use crate::encoder::Encoder;
use crate::shift_matrix::ShiftMatrix;

/// Encode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Encodes a message into a codeword")]
pub struct Args {
    /// Shift-matrix dump file for the code
    pub shift_matrix: PathBuf,
    /// Input file (message, as unpacked bits)
    pub input: PathBuf,
    /// Output file (codeword, as unpacked bits)
    pub output: PathBuf,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let shift_matrix = ShiftMatrix::from_dump(&fs::read_to_string(&self.shift_matrix)?)?;
        let encoder = Encoder::new(shift_matrix)?;
        let message = fs::read(&self.input)?;
        let codeword = encoder.encode(&message)?;
        fs::write(&self.output, &codeword)?;
        Ok(())
    }
}
