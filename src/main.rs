use anyhow::Result;
use clap::Parser;
use sb2_rs_core::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    sb2_rs_core::run_cli(&args)
}
