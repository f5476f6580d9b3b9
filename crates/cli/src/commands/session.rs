//! Session token minting for local development.
//!
//! Production tokens are issued by the external auth service; this command
//! exists so a local stack can exercise the authenticated API.

use uuid::Uuid;

use trendora_core::UserId;

use trendora_commerce::store::{CommerceStore, PgStore, create_pool};

use super::CliError;

/// Mint a bearer session token for the given user and print it.
pub async fn mint(user_id: i32) -> Result<(), CliError> {
    let database_url = super::database_url()?;
    let pool = create_pool(&database_url).await?;
    let store = PgStore::new(pool);

    let token = Uuid::new_v4().to_string();
    store.insert_session(&token, UserId::new(user_id)).await?;

    tracing::info!(%user_id, "session token minted");

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }

    Ok(())
}
