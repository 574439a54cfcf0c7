//! Carson CLI - command-line client for the Carson Living API

use clap::Parser;

mod cli;

use carson_living::Result;
use cli::{Cli, Commands, GlobalOptions};

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match &cli.command {
        Commands::Init => cli::init::run(&opts),
        Commands::Login => cli::login::run(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Query(args) => cli::query::run(&opts, args),
        Commands::Version => {
            println!("carson version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
