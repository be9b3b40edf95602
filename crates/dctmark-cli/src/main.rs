use clap::Parser;

use dctmark_core::Result;

mod cli;
mod commands;

use cli::{CliArgs, Commands};

fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let config = args.config();

    match args.command {
        Commands::Embed(embed) => embed.run(config),
        Commands::Extract(extract) => extract.run(config),
        Commands::Capacity(capacity) => capacity.run(config),
    }
}
