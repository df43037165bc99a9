use anyhow::Result;
use clap::Parser;

use srcveto::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
