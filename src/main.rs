mod cli;
mod codegen;
mod error;
mod fmt;
mod ledger;
mod models;
mod settings;
mod universe;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Code { selections, lang } => cli::code::run(&selections, lang.as_deref()),
        Commands::Give {
            selections,
            lang,
            guest_id,
        } => cli::give::run(&selections, lang.as_deref(), guest_id.as_deref()),
        Commands::Stats => cli::stats::run(),
        Commands::Universe { search } => cli::universe::run(search.as_deref()),
        Commands::Demo => cli::demo::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
