//! Trendora CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! trendora-cli migrate
//!
//! # Seed the catalog with demo products
//! trendora-cli seed
//!
//! # Mint a session token for a user (local development)
//! trendora-cli session -u 1
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run the commerce schema migrations
//! - `seed` - Seed the catalog with demo products
//! - `session` - Mint a bearer session token for a user

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "trendora-cli")]
#[command(author, version, about = "Trendora CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with demo products
    Seed,
    /// Mint a session token for a user
    Session {
        /// Numeric user ID the token authenticates as
        #[arg(short, long)]
        user_id: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
        Commands::Session { user_id } => commands::session::mint(user_id).await,
    }
}
