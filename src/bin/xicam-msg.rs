use anyhow::Result;
use xicam_core::cli;

fn main() -> Result<()> {
    cli::run()
}
