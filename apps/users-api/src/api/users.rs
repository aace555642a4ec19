//! Wires the users domain to its MongoDB collection.

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};
use tracing::info;

use crate::state::AppState;

fn repository(state: &AppState) -> MongoUserRepository {
    MongoUserRepository::with_collection(&state.db, &state.config.users_collection)
}

pub fn router(state: &AppState) -> Router {
    handlers::router(UserService::new(repository(state)))
}

/// Create the users collection indexes.
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!(
        collection = %state.config.users_collection,
        "User collection indexes created"
    );
    Ok(())
}
