//! User Service - Business logic layer

use axum_helpers::errors::validation_message;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::{Validate, ValidateEmail};

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// User service: input checks on top of a [`UserRepository`].
///
/// Each operation makes at most one repository call after its checks pass.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: ObjectId) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_hex()))
    }

    /// Look a user up by email. A malformed address is rejected before the
    /// repository is queried.
    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<User> {
        if !email.validate_email() {
            return Err(UserError::InvalidArgument(
                "email must be an email".to_string(),
            ));
        }

        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::InvalidArgument(validation_message(&e)))?;

        let has_username = input.username.as_deref().is_some_and(|u| !u.is_empty());
        if !has_username || input.email.is_empty() {
            return Err(UserError::InvalidArgument(
                "Missing required data".to_string(),
            ));
        }

        self.repository.create(input).await
    }

    /// Apply a partial update. An empty update returns the stored user as is.
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: ObjectId, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::InvalidArgument(validation_message(&e)))?;

        if input.is_empty() {
            return self.get_user(id).await;
        }

        self.repository
            .update(id, input)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_hex()))
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
