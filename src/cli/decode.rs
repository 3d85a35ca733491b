//! Decode CLI subcommand.
//!
//! Runs the fixed-point horizontal-layered belief-propagation decoder and
//! reports convergence to stdout.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::Run;
use crate::decoder::Decoder;
use crate::shift_matrix::ShiftMatrix;

/// Decode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Decodes a received word")]
pub struct Args {
    /// Shift-matrix dump file for the code
    pub shift_matrix: PathBuf,
    /// Input file (received word, as unpacked bits)
    pub received: PathBuf,
    /// Output file (estimated codeword, as unpacked bits)
    pub output: PathBuf,
    /// Maximum number of decoder iterations
    #[arg(long, default_value_t = 50)]
    pub max_iter: usize,
    /// Channel LLR magnitude used for both bits of the channel model
    #[arg(long, default_value_t = 2.75)]
    pub initial_llr: f64,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let shift_matrix = ShiftMatrix::from_dump(&fs::read_to_string(&self.shift_matrix)?)?;
        let decoder = Decoder::new(shift_matrix)?;
        let received = fs::read(&self.received)?;
        let output = decoder.decode(&received, self.max_iter, self.initial_llr)?;
        fs::write(&self.output, &output.codeword)?;
        println!("converged: {}", output.converged);
        println!("iterations: {}", output.iterations);
        Ok(())
    }
}
