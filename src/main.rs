//! PropTalk CLI - data-sync client for the PropTalk real-estate platform

use clap::Parser;
use colored::Colorize;

mod cli;
mod client;
mod config;
mod error;
mod hooks;
mod models;
mod output;
mod query;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug output with `--debug`.
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init { role } => cli::init::run(&opts, role),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("proptalk version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Admin(command) => cli::admin::run(&opts, command).await,
        Commands::Agent(command) => cli::agent::run(&opts, command).await,
        Commands::User(command) => cli::user::run(&opts, command).await,
    }
}
