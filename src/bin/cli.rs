// src/bin/cli.rs
use clap::Parser;
use grade_scrape::{cli, logging};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();

    cli::run(cli::Cli::parse())?;
    Ok(())
}
