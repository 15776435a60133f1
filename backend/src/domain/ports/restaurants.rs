//! Driving ports for restaurant use-cases.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::restaurant::{MenuGroup, PaymentType, Restaurant, RestaurantId};

/// Payload for creating a restaurant. Aggregates are never part of input;
/// they start at zero and only the aggregate service writes them.
#[derive(Debug, Clone)]
pub struct CreateRestaurantRequest {
    /// Display name.
    pub name: String,
    /// Accepted payment methods; must be non-empty.
    pub payment_types: BTreeSet<PaymentType>,
    /// Classification tags; must be non-empty.
    pub tags: BTreeSet<String>,
    /// Picture URLs.
    pub pictures: Vec<String>,
    /// Menu sections.
    pub menu_groups: Vec<MenuGroup>,
}

/// Payload for updating a restaurant. Name, payment types and tags are
/// required; pictures and menu groups keep their prior value when absent.
#[derive(Debug, Clone)]
pub struct UpdateRestaurantRequest {
    /// New display name.
    pub name: String,
    /// New payment methods; must be non-empty.
    pub payment_types: BTreeSet<PaymentType>,
    /// New tags; must be non-empty.
    pub tags: BTreeSet<String>,
    /// New picture URLs, or keep the stored ones.
    pub pictures: Option<Vec<String>>,
    /// New menu sections, or keep the stored ones.
    pub menu_groups: Option<Vec<MenuGroup>>,
}

/// Domain use-case port for restaurant mutations. Create/update/delete are
/// admin-only; like/dislike need any authenticated identity.
#[async_trait]
pub trait RestaurantsCommand: Send + Sync {
    /// Create a restaurant (admin only).
    async fn create(
        &self,
        identity: &Identity,
        request: CreateRestaurantRequest,
    ) -> Result<Restaurant, Error>;

    /// Update a restaurant (admin only).
    async fn update(
        &self,
        identity: &Identity,
        id: &RestaurantId,
        request: UpdateRestaurantRequest,
    ) -> Result<Restaurant, Error>;

    /// Delete a restaurant and cascade the removal of its reviews and
    /// references (admin only).
    async fn delete(&self, identity: &Identity, id: &RestaurantId) -> Result<(), Error>;

    /// Record that the acting user likes this restaurant. Fails with
    /// `Conflict` when already liked.
    async fn like(&self, identity: &Identity, id: &RestaurantId) -> Result<(), Error>;

    /// Withdraw the acting user's like. Fails with `Conflict` when the
    /// restaurant is not currently liked.
    async fn dislike(&self, identity: &Identity, id: &RestaurantId) -> Result<(), Error>;
}

/// Domain use-case port for restaurant reads.
#[async_trait]
pub trait RestaurantsQuery: Send + Sync {
    /// Fetch one restaurant.
    async fn get(&self, id: &RestaurantId) -> Result<Restaurant, Error>;

    /// All restaurants, most recently updated first.
    async fn list(&self) -> Result<Vec<Restaurant>, Error>;
}
