//! ACVI CLI - compute the Agro-Climatic Volatility Index and stress-test it.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "acvi-cli",
    version,
    about = "Agro-Climatic Volatility Index toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: acvi_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    acvi_cmd::run(cli.command)
}
