//! Shared application state.

use mongodb::{Client, Database};

/// Handed to route constructors; clones are cheap (the client pools
/// connections internally).
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}
