// src/bin/cli.rs
use color_eyre::eyre::Result;
use flare_scrape::cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let inv = cli::parse_args(std::env::args().skip(1))?;
    cli::run(&inv)?;
    Ok(())
}
