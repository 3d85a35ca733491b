use std::error::Error;

use clap::Parser;
use qc_ldpc_codec::cli::{Opt, Run};

#[termination::display]
fn main() -> Result<(), Box<dyn Error>> {
    Opt::parse().run()
}
