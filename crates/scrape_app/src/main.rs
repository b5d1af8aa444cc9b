mod cli;
mod driver;
mod logging;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    logging::initialize(args.log.into());
    driver::run(args)
}
