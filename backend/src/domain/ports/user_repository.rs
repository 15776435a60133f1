//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::restaurant::RestaurantId;
use crate::domain::review::ReviewId;
use crate::domain::user::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Store connection could not be established.
        Connection => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user store query failed: {message}",
    }
}

impl From<UserRepositoryError> for crate::domain::error::Error {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Self::internal(format!("user store error: {message}"))
            }
        }
    }
}

/// Driven port over the user collection.
///
/// Adapters provide per-document atomicity only; multi-document invariants
/// are the reference coordinator's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user document.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by unique email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// All users, most recently updated first.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Replace the stored document with `user` (matched by id).
    async fn update(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Remove a user document. Missing ids are a no-op.
    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError>;

    /// Remove every occurrence of the given review ids from all users'
    /// `reviews` lists.
    async fn pull_review_refs(&self, review_ids: &[ReviewId]) -> Result<(), UserRepositoryError>;

    /// Remove `restaurant_id` from every user's `likes` list.
    async fn pull_like_refs(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<(), UserRepositoryError>;
}
