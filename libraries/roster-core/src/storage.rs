//! Storage trait for the user resource

use crate::error::Result;
use crate::types::{NewUser, User, UserId, UserSummary};
use async_trait::async_trait;

/// CRUD access to persisted users.
///
/// Implementations are the sole writers of user rows. Every lookup is by
/// exact id; a missing row is reported as [`RosterError::UserNotFound`].
///
/// [`RosterError::UserNotFound`]: crate::RosterError::UserNotFound
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in the store's default order
    async fn list_users(&self) -> Result<Vec<User>>;

    /// One user by id
    async fn get_user(&self, id: UserId) -> Result<User>;

    /// Insert a user, returning it with the newly assigned id.
    ///
    /// A duplicate email surfaces as a storage error, not as a validation error.
    async fn create_user(&self, user: NewUser) -> Result<UserSummary>;

    /// Overwrite name and email of an existing user
    async fn update_user(&self, id: UserId, user: NewUser) -> Result<UserSummary>;

    /// Physically delete a user
    async fn delete_user(&self, id: UserId) -> Result<()>;
}
