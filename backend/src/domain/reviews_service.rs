//! Review use-cases: create, partial update, delete, pin, unpin.
//!
//! Mutations follow the ordered sequence review write → reference writes →
//! aggregate recompute, all synchronous within the request.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::aggregates::Aggregates;
use super::error::Error;
use super::identity::Identity;
use super::ports::{
    CreateReviewRequest, RestaurantRepository, ReviewRepository, ReviewsCommand, ReviewsQuery,
    UpdateReviewRequest, UserRepository,
};
use super::references::ReferenceCoordinator;
use super::restaurant::{Restaurant, RestaurantId};
use super::review::{Review, ReviewId};

/// Review service implementing the driving ports.
pub struct ReviewsService<U, R, V> {
    users: Arc<U>,
    restaurants: Arc<R>,
    reviews: Arc<V>,
    references: Arc<ReferenceCoordinator<U, R, V>>,
    aggregates: Arc<Aggregates<R, V>>,
}

impl<U, R, V> ReviewsService<U, R, V> {
    /// Create the service over shared repositories and core services.
    pub fn new(
        users: Arc<U>,
        restaurants: Arc<R>,
        reviews: Arc<V>,
        references: Arc<ReferenceCoordinator<U, R, V>>,
        aggregates: Arc<Aggregates<R, V>>,
    ) -> Self {
        Self {
            users,
            restaurants,
            reviews,
            references,
            aggregates,
        }
    }
}

impl<U, R, V> ReviewsService<U, R, V>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
{
    async fn load(&self, id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("review {id} not found")))
    }
}

#[async_trait]
impl<U, R, V> ReviewsCommand for ReviewsService<U, R, V>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
{
    async fn create(
        &self,
        identity: &Identity,
        request: CreateReviewRequest,
    ) -> Result<Review, Error> {
        let Some(user) = self.users.find_by_id(&identity.user_id).await? else {
            return Err(Error::not_found(format!(
                "user {} not found",
                identity.user_id
            )));
        };
        let Some(restaurant) = self.restaurants.find_by_id(&request.restaurant).await? else {
            return Err(Error::not_found(format!(
                "restaurant {} not found",
                request.restaurant
            )));
        };
        if self
            .reviews
            .find_by_owner_and_restaurant(&user.id, &restaurant.id)
            .await?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "user {} already reviewed restaurant {}",
                user.id, restaurant.id
            )));
        }

        let review = Review::new(
            user.id,
            restaurant.id,
            request.content,
            request.score,
            request.price,
        );
        self.reviews.insert(&review).await?;
        self.references.attach_review(&review).await?;
        self.aggregates.recompute(&review.restaurant).await?;
        Ok(review)
    }

    async fn update(
        &self,
        identity: &Identity,
        id: &ReviewId,
        request: UpdateReviewRequest,
    ) -> Result<Review, Error> {
        let mut review = self.load(id).await?;
        identity.require_owner(&review.user)?;

        if let Some(content) = request.content {
            review.content = content;
        }
        if let Some(score) = request.score {
            review.score = score;
        }
        if let Some(price) = request.price {
            review.price = Some(price);
        }
        review.updated_at = Utc::now();
        self.reviews.update(&review).await?;
        self.aggregates.recompute(&review.restaurant).await?;
        Ok(review)
    }

    async fn delete(&self, identity: &Identity, id: &ReviewId) -> Result<(), Error> {
        let review = self.load(id).await?;
        identity.require_owner(&review.user)?;

        self.reviews.delete(id).await?;
        self.references.detach_review(&review).await?;
        self.aggregates.recompute(&review.restaurant).await?;
        Ok(())
    }

    async fn pin(
        &self,
        identity: &Identity,
        restaurant: &RestaurantId,
        review: &ReviewId,
    ) -> Result<Restaurant, Error> {
        debug!(user_id = %identity.user_id, restaurant_id = %restaurant, review_id = %review, "pinning review");
        self.references.pin_review(restaurant, review).await
    }

    async fn unpin(
        &self,
        identity: &Identity,
        restaurant: &RestaurantId,
    ) -> Result<Restaurant, Error> {
        debug!(user_id = %identity.user_id, restaurant_id = %restaurant, "unpinning review");
        self.references.unpin_review(restaurant).await
    }
}

#[async_trait]
impl<U, R, V> ReviewsQuery for ReviewsService<U, R, V>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
{
    async fn get(&self, id: &ReviewId) -> Result<Review, Error> {
        self.load(id).await
    }

    async fn list(&self) -> Result<Vec<Review>, Error> {
        Ok(self.reviews.list().await?)
    }
}
