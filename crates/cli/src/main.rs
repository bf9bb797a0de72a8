//! `lightbus` command-line front-end. Wires `lightbus-client` to
//! whichever transports the loaded [`lightbus_core::ClientConfig`] names.

mod commands;
mod config;
mod transports;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lightbus")]
#[command(version, about = "Lightbus message bus client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bus client on the loaded configuration and run until interrupted.
    Run,
    /// List the APIs named in the loaded configuration.
    Inspect,
    /// Open an interactive client for ad hoc call/fire.
    Shell,
    /// Print the JSON schema of the configuration.
    Dumpconfigschema,
}

#[tokio::main]
async fn main() {
    lightbus_observability::init();

    let cli = Cli::parse();

    // `dumpconfigschema` never touches the environment or a broker, so it
    // runs before configuration is loaded and can't fail on config errors.
    if let Commands::Dumpconfigschema = cli.command {
        if let Err(err) = commands::dumpconfigschema::execute() {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
        std::process::exit(0);
    }

    let loaded = match config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => commands::run::execute(loaded).await,
        Commands::Inspect => commands::inspect::execute(&loaded),
        Commands::Shell => commands::shell::execute(loaded).await,
        Commands::Dumpconfigschema => unreachable!("handled above"),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            let code = if is_interrupt(&err) { 130 } else { 2 };
            eprintln!("error: {err}");
            std::process::exit(code);
        }
    }
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    err.downcast_ref::<commands::Interrupted>().is_some()
}
