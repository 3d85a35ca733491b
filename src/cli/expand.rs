//! Expand CLI subcommand.
//!
//! Expands a shift-matrix dump into the full parity check matrix and
//! writes it in alist format.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::Run;
use crate::expand::expand_h;
use crate::shift_matrix::ShiftMatrix;

/// Expand CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Expands a shift matrix into an alist parity check matrix")]
pub struct Args {
    /// Shift-matrix dump file for the code
    pub shift_matrix: PathBuf,
    /// Output alist file; omit to print to stdout
    pub output: Option<PathBuf>,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let shift_matrix = ShiftMatrix::from_dump(&fs::read_to_string(&self.shift_matrix)?)?;
        let alist = expand_h(&shift_matrix).alist();
        match &self.output {
            Some(path) => fs::write(path, alist)?,
            None => print!("{alist}"),
        }
        Ok(())
    }
}
