use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::UserResult;
use crate::models::{CreateUser, UpdateUser, User};

/// Repository trait for user persistence.
///
/// Implementations own id assignment and default values; callers pass
/// already-validated DTOs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user. No ordering guarantee.
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Store a new user with a fresh id and defaults for unset fields.
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Apply the present fields of `input`. Returns the updated user, or
    /// `None` if `id` does not exist.
    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<Option<User>>;
}
