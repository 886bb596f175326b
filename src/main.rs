use clap::Parser;
use credvault::cli::commands;
use credvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable controlling log verbosity (e.g. `debug`).
const LOG_ENV: &str = "CREDVAULT_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Set {
            ref provider,
            ref value,
            force,
        } => commands::set::execute(&cli, provider, value.as_deref(), force),
        Commands::Get {
            ref provider,
            no_setup,
        } => commands::get::execute(&cli, provider, no_setup),
        Commands::Delete {
            ref provider,
            force,
        } => commands::delete::execute(&cli, provider, force),
        Commands::List => commands::list::execute(&cli),
        Commands::Status => commands::status::execute(&cli),
        Commands::Detect { ref value } => commands::detect::execute(&cli, value.as_deref()),
        Commands::Mask { ref value } => commands::mask::execute(&cli, value.as_deref()),
        Commands::Clear { force } => commands::clear::execute(&cli, force),
        Commands::History { last, ref since } => {
            commands::history::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `get`, `detect` and `mask`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
