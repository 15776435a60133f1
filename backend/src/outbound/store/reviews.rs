//! In-memory adapter for the review collection.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{RestaurantId, Review, ReviewId, UserId};

/// `HashMap`-backed implementation of the review repository port.
#[derive(Default)]
pub struct MemoryReviewRepository {
    documents: RwLock<HashMap<Uuid, Review>>,
}

impl MemoryReviewRepository {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut documents = self.documents.write().await;
        documents.insert(*review.id.as_uuid(), review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id.as_uuid()).cloned())
    }

    async fn find_by_owner_and_restaurant(
        &self,
        user_id: &UserId,
        restaurant_id: &RestaurantId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .find(|review| review.user == *user_id && review.restaurant == *restaurant_id)
            .cloned())
    }

    async fn find_by_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|review| review.restaurant == *restaurant_id)
            .cloned()
            .collect())
    }

    async fn find_by_owner(&self, user_id: &UserId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|review| review.user == *user_id)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Review>, ReviewRepositoryError> {
        let documents = self.documents.read().await;
        let mut reviews: Vec<Review> = documents.values().cloned().collect();
        reviews.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(reviews)
    }

    async fn update(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut documents = self.documents.write().await;
        if let Some(stored) = documents.get_mut(review.id.as_uuid()) {
            *stored = review.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), ReviewRepositoryError> {
        let mut documents = self.documents.write().await;
        documents.remove(id.as_uuid());
        Ok(())
    }

    async fn delete_many(&self, review_ids: &[ReviewId]) -> Result<(), ReviewRepositoryError> {
        let mut documents = self.documents.write().await;
        for id in review_ids {
            documents.remove(id.as_uuid());
        }
        Ok(())
    }
}
