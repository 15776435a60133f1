//! Driving ports for review use-cases.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::restaurant::{Restaurant, RestaurantId};
use crate::domain::review::{Price, Review, ReviewContent, ReviewId, Score};

/// Payload for creating a review. The owner is the acting identity, never a
/// client-supplied field.
#[derive(Debug, Clone)]
pub struct CreateReviewRequest {
    /// Reviewed restaurant.
    pub restaurant: RestaurantId,
    /// Review text.
    pub content: ReviewContent,
    /// Score, 0–10.
    pub score: Score,
    /// Amount paid, if shared.
    pub price: Option<Price>,
}

/// Payload for updating a review. Absent fields stay unchanged; a price can
/// therefore not be cleared, only replaced.
#[derive(Debug, Clone, Default)]
pub struct UpdateReviewRequest {
    /// New review text.
    pub content: Option<ReviewContent>,
    /// New score.
    pub score: Option<Score>,
    /// New price.
    pub price: Option<Price>,
}

/// Domain use-case port for review mutations. Update and delete are
/// owner-only; pin/unpin need any authenticated identity.
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Create a review for the acting user. Fails with `Conflict` when the
    /// user already reviewed the restaurant.
    async fn create(
        &self,
        identity: &Identity,
        request: CreateReviewRequest,
    ) -> Result<Review, Error>;

    /// Update a review (owner only).
    async fn update(
        &self,
        identity: &Identity,
        id: &ReviewId,
        request: UpdateReviewRequest,
    ) -> Result<Review, Error>;

    /// Delete a review (owner only) and detach its references.
    async fn delete(&self, identity: &Identity, id: &ReviewId) -> Result<(), Error>;

    /// Pin `review` on `restaurant`. The review must belong to the
    /// restaurant; a mismatch fails with `Conflict`.
    async fn pin(
        &self,
        identity: &Identity,
        restaurant: &RestaurantId,
        review: &ReviewId,
    ) -> Result<Restaurant, Error>;

    /// Clear the restaurant's pinned review. Idempotent.
    async fn unpin(&self, identity: &Identity, restaurant: &RestaurantId)
        -> Result<Restaurant, Error>;
}

/// Domain use-case port for review reads.
#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    /// Fetch one review.
    async fn get(&self, id: &ReviewId) -> Result<Review, Error>;

    /// All reviews, most recently updated first.
    async fn list(&self) -> Result<Vec<Review>, Error>;
}
