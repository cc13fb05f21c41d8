//! mcat - Medallion catalog CLI

use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{erd, evaluate, export, ls, validate};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match &cli.command {
        Commands::Ls(args) => ls::execute(args, &cli.global).await,
        Commands::Export(args) => export::execute(args, &cli.global).await,
        Commands::Validate(args) => validate::execute(args, &cli.global).await,
        Commands::Evaluate(args) => evaluate::execute(args, &cli.global).await,
        Commands::Erd(args) => erd::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
