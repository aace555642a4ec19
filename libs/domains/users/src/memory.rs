//! In-memory [`UserRepository`], for tests and running without MongoDB.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{CreateUser, UpdateUser, User, UserDocument};
use crate::repository::UserRepository;

/// Users keyed by hex id behind an async `RwLock`. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut list: Vec<User> = users.values().cloned().collect();
        // ObjectId hex sorts by creation time
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id.to_hex()).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let user = User::from(UserDocument::new(input));
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id.to_hex()) else {
            return Ok(None);
        };

        user.apply_update(input);
        tracing::info!(user_id = %id, "User updated successfully");
        Ok(Some(user.clone()))
    }
}
