//! In-memory adapter for the user collection.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, RestaurantId, ReviewId, User, UserId};

/// `HashMap`-backed implementation of the user repository port.
#[derive(Default)]
pub struct MemoryUserRepository {
    documents: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut documents = self.documents.write().await;
        documents.insert(*user.id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id.as_uuid()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.values().find(|user| user.email == *email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let documents = self.documents.read().await;
        let mut users: Vec<User> = documents.values().cloned().collect();
        users.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut documents = self.documents.write().await;
        if let Some(stored) = documents.get_mut(user.id.as_uuid()) {
            *stored = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut documents = self.documents.write().await;
        documents.remove(id.as_uuid());
        Ok(())
    }

    async fn pull_review_refs(&self, review_ids: &[ReviewId]) -> Result<(), UserRepositoryError> {
        let mut documents = self.documents.write().await;
        for user in documents.values_mut() {
            let before = user.reviews.len();
            user.reviews.retain(|id| !review_ids.contains(id));
            if user.reviews.len() != before {
                user.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn pull_like_refs(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<(), UserRepositoryError> {
        let mut documents = self.documents.write().await;
        for user in documents.values_mut() {
            let before = user.likes.len();
            user.likes.retain(|id| id != restaurant_id);
            if user.likes.len() != before {
                user.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}
