//! Database migration command.
//!
//! Runs the embedded commerce migrations against `DATABASE_URL`. The
//! server binaries never migrate on startup; this command is the only
//! migration path.

use trendora_commerce::store::{MIGRATOR, create_pool};

use super::CliError;

/// Run the commerce schema migrations.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
