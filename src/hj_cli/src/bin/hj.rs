use clap::Parser;
use hj::{logger, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::start(&cli)?;
    hj::execute(&cli, &mut std::io::stdout().lock())
}
