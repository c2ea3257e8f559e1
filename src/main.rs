use anyhow::Result;
use clap::Parser;
use wallet::cli::Cli;
use wallet::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.run()
}
