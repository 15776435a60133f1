//! In-memory adapter for the restaurant collection.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{RestaurantRepository, RestaurantRepositoryError};
use crate::domain::{Restaurant, RestaurantId, ReviewId};

/// `HashMap`-backed implementation of the restaurant repository port.
#[derive(Default)]
pub struct MemoryRestaurantRepository {
    documents: RwLock<HashMap<Uuid, Restaurant>>,
}

impl MemoryRestaurantRepository {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RestaurantRepository for MemoryRestaurantRepository {
    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        let mut documents = self.documents.write().await;
        documents.insert(*restaurant.id.as_uuid(), restaurant.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id.as_uuid()).cloned())
    }

    async fn list(&self) -> Result<Vec<Restaurant>, RestaurantRepositoryError> {
        let documents = self.documents.read().await;
        let mut restaurants: Vec<Restaurant> = documents.values().cloned().collect();
        restaurants.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(restaurants)
    }

    async fn find_by_review_refs(
        &self,
        review_ids: &[ReviewId],
    ) -> Result<Vec<Restaurant>, RestaurantRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|restaurant| restaurant.reviews.iter().any(|id| review_ids.contains(id)))
            .cloned()
            .collect())
    }

    async fn update(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        let mut documents = self.documents.write().await;
        if let Some(stored) = documents.get_mut(restaurant.id.as_uuid()) {
            *stored = restaurant.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &RestaurantId) -> Result<(), RestaurantRepositoryError> {
        let mut documents = self.documents.write().await;
        documents.remove(id.as_uuid());
        Ok(())
    }

    async fn pull_review_refs(
        &self,
        review_ids: &[ReviewId],
    ) -> Result<(), RestaurantRepositoryError> {
        let mut documents = self.documents.write().await;
        for restaurant in documents.values_mut() {
            let before = restaurant.reviews.len();
            restaurant.reviews.retain(|id| !review_ids.contains(id));
            let pin_cleared = matches!(
                restaurant.pinned_review,
                Some(pinned) if review_ids.contains(&pinned)
            );
            if pin_cleared {
                restaurant.pinned_review = None;
            }
            if restaurant.reviews.len() != before || pin_cleared {
                restaurant.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::PaymentType;
    use std::collections::BTreeSet;

    fn restaurant(name: &str) -> Restaurant {
        Restaurant::new(
            name,
            BTreeSet::from([PaymentType::Card]),
            BTreeSet::from(["bistro".to_owned()]),
            Vec::new(),
            Vec::new(),
        )
        .expect("valid restaurant")
    }

    #[tokio::test]
    async fn pull_review_refs_clears_matching_pins() {
        let repo = MemoryRestaurantRepository::new();
        let mut stored = restaurant("Chez Test");
        let pinned = ReviewId::random();
        let kept = ReviewId::random();
        stored.reviews = vec![pinned, kept];
        stored.pinned_review = Some(pinned);
        repo.insert(&stored).await.expect("insert");

        repo.pull_review_refs(&[pinned]).await.expect("pull");

        let updated = repo
            .find_by_id(&stored.id)
            .await
            .expect("query")
            .expect("present");
        assert_eq!(updated.reviews, vec![kept]);
        assert!(updated.pinned_review.is_none());
    }

    #[tokio::test]
    async fn find_by_review_refs_matches_holders_only() {
        let repo = MemoryRestaurantRepository::new();
        let mut holder = restaurant("Holder");
        let review_id = ReviewId::random();
        holder.reviews = vec![review_id];
        let bystander = restaurant("Bystander");
        repo.insert(&holder).await.expect("insert");
        repo.insert(&bystander).await.expect("insert");

        let found = repo.find_by_review_refs(&[review_id]).await.expect("query");
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|r| r.id), Some(holder.id));
    }
}
