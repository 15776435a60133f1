//! Port abstraction for review persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::restaurant::RestaurantId;
use crate::domain::review::{Review, ReviewId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Store connection could not be established.
        Connection => "review store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "review store query failed: {message}",
    }
}

impl From<ReviewRepositoryError> for crate::domain::error::Error {
    fn from(error: ReviewRepositoryError) -> Self {
        match error {
            ReviewRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("review store unavailable: {message}"))
            }
            ReviewRepositoryError::Query { message } => {
                Self::internal(format!("review store error: {message}"))
            }
        }
    }
}

/// Driven port over the review collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review document.
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Fetch a review by identifier.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// The unique review a user wrote for a restaurant, if any.
    async fn find_by_owner_and_restaurant(
        &self,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    /// All reviews of a restaurant.
    async fn find_by_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// All reviews authored by a user.
    async fn find_by_owner(&self, user_id: &UserId) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// All reviews, most recently updated first.
    async fn list(&self) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Replace the stored document with `review` (matched by id).
    async fn update(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Remove a review document. Missing ids are a no-op.
    async fn delete(&self, id: &ReviewId) -> Result<(), ReviewRepositoryError>;

    /// Remove every review in `review_ids`.
    async fn delete_many(&self, review_ids: &[ReviewId]) -> Result<(), ReviewRepositoryError>;
}
