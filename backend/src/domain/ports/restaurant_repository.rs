//! Port abstraction for restaurant persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::restaurant::{Restaurant, RestaurantId};
use crate::domain::review::ReviewId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by restaurant repository adapters.
    pub enum RestaurantRepositoryError {
        /// Store connection could not be established.
        Connection => "restaurant store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "restaurant store query failed: {message}",
    }
}

impl From<RestaurantRepositoryError> for crate::domain::error::Error {
    fn from(error: RestaurantRepositoryError) -> Self {
        match error {
            RestaurantRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("restaurant store unavailable: {message}"))
            }
            RestaurantRepositoryError::Query { message } => {
                Self::internal(format!("restaurant store error: {message}"))
            }
        }
    }
}

/// Driven port over the restaurant collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Insert a new restaurant document.
    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError>;

    /// Fetch a restaurant by identifier.
    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError>;

    /// All restaurants, most recently updated first.
    async fn list(&self) -> Result<Vec<Restaurant>, RestaurantRepositoryError>;

    /// Restaurants whose `reviews` list contains any of the given ids.
    async fn find_by_review_refs(
        &self,
        review_ids: &[ReviewId],
    ) -> Result<Vec<Restaurant>, RestaurantRepositoryError>;

    /// Replace the stored document with `restaurant` (matched by id).
    async fn update(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError>;

    /// Remove a restaurant document. Missing ids are a no-op.
    async fn delete(&self, id: &RestaurantId) -> Result<(), RestaurantRepositoryError>;

    /// Remove every occurrence of the given review ids from all
    /// restaurants' `reviews` lists, clearing `pinned_review` where it
    /// matches one of them.
    async fn pull_review_refs(
        &self,
        review_ids: &[ReviewId],
    ) -> Result<(), RestaurantRepositoryError>;
}
