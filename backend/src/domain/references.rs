//! Cross-document reference maintenance.
//!
//! Every mutation of a reference list (`user.likes`, `user.reviews`,
//! `restaurant.reviews`, `restaurant.pinned_review`) flows through this
//! coordinator so the bidirectional lists cannot drift behind scattered
//! call sites.
//!
//! Cascades run as an explicit ordered sequence: primary entity write
//! (done by the caller) → dependent-reference writes → aggregate recompute
//! (done by the caller where applicable). The store offers per-document
//! atomicity only, so a failure mid-sequence leaves the later steps
//! unapplied; each step logs the ids involved before the typed error
//! surfaces, and no compensating rollback is attempted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};

use super::error::Error;
use super::ports::{RestaurantRepository, ReviewRepository, UserRepository};
use super::restaurant::{Restaurant, RestaurantId};
use super::review::{Review, ReviewId};
use super::user::{User, UserId};

/// Single owner of every cross-document reference mutation.
pub struct ReferenceCoordinator<U, R, V> {
    users: Arc<U>,
    restaurants: Arc<R>,
    reviews: Arc<V>,
}

impl<U, R, V> ReferenceCoordinator<U, R, V> {
    /// Create the coordinator over the given repositories.
    pub fn new(users: Arc<U>, restaurants: Arc<R>, reviews: Arc<V>) -> Self {
        Self {
            users,
            restaurants,
            reviews,
        }
    }
}

impl<U, R, V> ReferenceCoordinator<U, R, V>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
{
    /// Record a freshly inserted review on its owner and restaurant.
    ///
    /// Both documents were resolved by the caller moments ago; their
    /// disappearance here means the cascade lost a race with a delete and
    /// the reference cannot be recorded.
    pub async fn attach_review(&self, review: &Review) -> Result<(), Error> {
        let Some(mut user) = self.users.find_by_id(&review.user).await? else {
            error!(review_id = %review.id, user_id = %review.user, "review owner vanished before reference write");
            return Err(Error::internal("review owner vanished mid-create"));
        };
        if !user.reviews.contains(&review.id) {
            user.reviews.push(review.id);
            user.updated_at = Utc::now();
            self.users.update(&user).await?;
        }

        let Some(mut restaurant) = self.restaurants.find_by_id(&review.restaurant).await? else {
            error!(review_id = %review.id, restaurant_id = %review.restaurant, "reviewed restaurant vanished before reference write");
            return Err(Error::internal("reviewed restaurant vanished mid-create"));
        };
        if !restaurant.reviews.contains(&review.id) {
            restaurant.reviews.push(review.id);
            restaurant.updated_at = Utc::now();
            self.restaurants.update(&restaurant).await?;
        }
        Ok(())
    }

    /// Remove a deleted review from its owner and restaurant, clearing the
    /// restaurant's pin when it pointed at this review.
    ///
    /// Either side may already be gone during a wider cascade; missing
    /// documents are skipped.
    pub async fn detach_review(&self, review: &Review) -> Result<(), Error> {
        if let Some(mut user) = self.users.find_by_id(&review.user).await? {
            user.reviews.retain(|id| *id != review.id);
            user.updated_at = Utc::now();
            self.users.update(&user).await?;
        }

        if let Some(mut restaurant) = self.restaurants.find_by_id(&review.restaurant).await? {
            restaurant.reviews.retain(|id| *id != review.id);
            if restaurant.pinned_review == Some(review.id) {
                restaurant.pinned_review = None;
            }
            restaurant.updated_at = Utc::now();
            self.restaurants.update(&restaurant).await?;
        }
        Ok(())
    }

    /// Cascade for a deleted restaurant: drop its reviews, then scrub the
    /// dangling review ids and the like references from every user.
    ///
    /// No aggregate recompute follows; the restaurant is gone.
    pub async fn purge_restaurant(&self, restaurant: &Restaurant) -> Result<(), Error> {
        let orphaned = self.reviews.find_by_restaurant(&restaurant.id).await?;
        let review_ids: Vec<ReviewId> = orphaned.iter().map(|review| review.id).collect();

        self.reviews
            .delete_many(&review_ids)
            .await
            .inspect_err(|source| {
                error!(restaurant_id = %restaurant.id, %source, "restaurant cascade halted deleting reviews");
            })?;
        self.users
            .pull_review_refs(&review_ids)
            .await
            .inspect_err(|source| {
                error!(restaurant_id = %restaurant.id, %source, "restaurant cascade halted scrubbing user reviews");
            })?;
        self.users
            .pull_like_refs(&restaurant.id)
            .await
            .inspect_err(|source| {
                error!(restaurant_id = %restaurant.id, %source, "restaurant cascade halted scrubbing likes");
            })?;
        Ok(())
    }

    /// Cascade for a deleted user: drop their reviews and scrub the ids
    /// from every restaurant that held one.
    ///
    /// Returns the affected restaurant ids so the caller can recompute
    /// their aggregates.
    pub async fn purge_user(&self, user: &User) -> Result<Vec<RestaurantId>, Error> {
        let authored = self.reviews.find_by_owner(&user.id).await?;
        let review_ids: Vec<ReviewId> = authored.iter().map(|review| review.id).collect();

        // Resolve the holders before the pull rewrites their lists.
        let affected = self.restaurants.find_by_review_refs(&review_ids).await?;
        let affected_ids: Vec<RestaurantId> =
            affected.iter().map(|restaurant| restaurant.id).collect();

        self.reviews
            .delete_many(&review_ids)
            .await
            .inspect_err(|source| {
                error!(user_id = %user.id, %source, "user cascade halted deleting reviews");
            })?;
        self.restaurants
            .pull_review_refs(&review_ids)
            .await
            .inspect_err(|source| {
                error!(user_id = %user.id, %source, "user cascade halted scrubbing restaurant reviews");
            })?;
        Ok(affected_ids)
    }

    /// Record that `user_id` likes `restaurant_id`.
    pub async fn like(&self, user_id: &UserId, restaurant_id: &RestaurantId) -> Result<(), Error> {
        let (mut user, _) = self.resolve_pair(user_id, restaurant_id).await?;
        if user.likes.contains(restaurant_id) {
            return Err(Error::conflict(format!(
                "user {user_id} already likes restaurant {restaurant_id}"
            )));
        }
        user.likes.push(*restaurant_id);
        user.updated_at = Utc::now();
        self.users.update(&user).await?;
        Ok(())
    }

    /// Withdraw `user_id`'s like of `restaurant_id`.
    pub async fn dislike(
        &self,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
    ) -> Result<(), Error> {
        let (mut user, _) = self.resolve_pair(user_id, restaurant_id).await?;
        if !user.likes.contains(restaurant_id) {
            return Err(Error::conflict(format!(
                "user {user_id} does not like restaurant {restaurant_id}"
            )));
        }
        user.likes.retain(|id| id != restaurant_id);
        user.updated_at = Utc::now();
        self.users.update(&user).await?;
        Ok(())
    }

    /// Pin `review_id` on `restaurant_id`.
    ///
    /// The review must belong to the restaurant; anything else would leave
    /// a pin pointing outside the restaurant's own review set.
    pub async fn pin_review(
        &self,
        restaurant_id: &RestaurantId,
        review_id: &ReviewId,
    ) -> Result<Restaurant, Error> {
        let Some(mut restaurant) = self.restaurants.find_by_id(restaurant_id).await? else {
            return Err(Error::not_found(format!(
                "restaurant {restaurant_id} not found"
            )));
        };
        let Some(review) = self.reviews.find_by_id(review_id).await? else {
            return Err(Error::not_found(format!("review {review_id} not found")));
        };
        if review.restaurant != restaurant.id {
            warn!(restaurant_id = %restaurant.id, review_id = %review.id, "refused to pin a foreign review");
            return Err(Error::conflict(format!(
                "review {review_id} does not belong to restaurant {restaurant_id}"
            )));
        }
        restaurant.pinned_review = Some(review.id);
        restaurant.updated_at = Utc::now();
        self.restaurants.update(&restaurant).await?;
        Ok(restaurant)
    }

    /// Clear the restaurant's pinned review. Idempotent: unpinning an
    /// unpinned restaurant succeeds.
    pub async fn unpin_review(&self, restaurant_id: &RestaurantId) -> Result<Restaurant, Error> {
        let Some(mut restaurant) = self.restaurants.find_by_id(restaurant_id).await? else {
            return Err(Error::not_found(format!(
                "restaurant {restaurant_id} not found"
            )));
        };
        restaurant.pinned_review = None;
        restaurant.updated_at = Utc::now();
        self.restaurants.update(&restaurant).await?;
        Ok(restaurant)
    }

    async fn resolve_pair(
        &self,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
    ) -> Result<(User, Restaurant), Error> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Err(Error::not_found(format!("user {user_id} not found")));
        };
        let Some(restaurant) = self.restaurants.find_by_id(restaurant_id).await? else {
            return Err(Error::not_found(format!(
                "restaurant {restaurant_id} not found"
            )));
        };
        Ok((user, restaurant))
    }
}
