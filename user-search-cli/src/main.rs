use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{find::FindArgs, serve::ServeArgs};

/// user-search - person-record search server and client
#[derive(Parser)]
#[command(name = "user-search")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search server
    Serve(ServeArgs),
    /// Query a running search server
    Find(FindArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Find(args) => commands::find::execute(args).await,
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            for cause in e.chain().skip(1) {
                eprintln!("\n{} {}", "Caused by:".yellow(), cause);
            }

            std::process::exit(1);
        }
    }
}
