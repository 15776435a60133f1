//! Restaurant use-cases: admin-gated CRUD plus like/dislike.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::error::Error;
use super::identity::Identity;
use super::ports::{
    CreateRestaurantRequest, RestaurantRepository, RestaurantsCommand, RestaurantsQuery,
    ReviewRepository, UpdateRestaurantRequest, UserRepository,
};
use super::references::ReferenceCoordinator;
use super::restaurant::{validate_tags, Restaurant, RestaurantId, RestaurantValidationError};
use super::user::Role;

/// Restaurant service implementing the driving ports.
pub struct RestaurantsService<U, R, V> {
    restaurants: Arc<R>,
    references: Arc<ReferenceCoordinator<U, R, V>>,
}

impl<U, R, V> RestaurantsService<U, R, V> {
    /// Create the service over shared repositories and the coordinator.
    pub fn new(restaurants: Arc<R>, references: Arc<ReferenceCoordinator<U, R, V>>) -> Self {
        Self {
            restaurants,
            references,
        }
    }
}

fn map_validation_error(error: RestaurantValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

impl<U, R, V> RestaurantsService<U, R, V>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
{
    async fn load(&self, id: &RestaurantId) -> Result<Restaurant, Error> {
        self.restaurants
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("restaurant {id} not found")))
    }
}

#[async_trait]
impl<U, R, V> RestaurantsCommand for RestaurantsService<U, R, V>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
{
    async fn create(
        &self,
        identity: &Identity,
        request: CreateRestaurantRequest,
    ) -> Result<Restaurant, Error> {
        identity.require_role(Role::Admin)?;

        let restaurant = Restaurant::new(
            request.name,
            request.payment_types,
            request.tags,
            request.pictures,
            request.menu_groups,
        )
        .map_err(map_validation_error)?;
        self.restaurants.insert(&restaurant).await?;
        Ok(restaurant)
    }

    async fn update(
        &self,
        identity: &Identity,
        id: &RestaurantId,
        request: UpdateRestaurantRequest,
    ) -> Result<Restaurant, Error> {
        identity.require_role(Role::Admin)?;

        let mut restaurant = self.load(id).await?;
        if request.name.trim().is_empty() {
            return Err(map_validation_error(RestaurantValidationError::EmptyName));
        }
        if request.payment_types.is_empty() {
            return Err(map_validation_error(
                RestaurantValidationError::NoPaymentTypes,
            ));
        }
        restaurant.name = request.name;
        restaurant.payment_types = request.payment_types;
        restaurant.tags = validate_tags(request.tags).map_err(map_validation_error)?;
        if let Some(pictures) = request.pictures {
            restaurant.pictures = pictures;
        }
        if let Some(menu_groups) = request.menu_groups {
            restaurant.menu_groups = menu_groups;
        }
        restaurant.updated_at = Utc::now();
        self.restaurants.update(&restaurant).await?;
        Ok(restaurant)
    }

    async fn delete(&self, identity: &Identity, id: &RestaurantId) -> Result<(), Error> {
        identity.require_role(Role::Admin)?;

        let restaurant = self.load(id).await?;
        self.restaurants.delete(id).await?;
        self.references.purge_restaurant(&restaurant).await?;
        info!(restaurant_id = %id, admin_id = %identity.user_id, "restaurant deleted");
        Ok(())
    }

    async fn like(&self, identity: &Identity, id: &RestaurantId) -> Result<(), Error> {
        self.references.like(&identity.user_id, id).await
    }

    async fn dislike(&self, identity: &Identity, id: &RestaurantId) -> Result<(), Error> {
        self.references.dislike(&identity.user_id, id).await
    }
}

#[async_trait]
impl<U, R, V> RestaurantsQuery for RestaurantsService<U, R, V>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
{
    async fn get(&self, id: &RestaurantId) -> Result<Restaurant, Error> {
        self.load(id).await
    }

    async fn list(&self) -> Result<Vec<Restaurant>, Error> {
        Ok(self.restaurants.list().await?)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockRestaurantRepository, MockReviewRepository, MockUserRepository,
    };
    use crate::domain::restaurant::PaymentType;
    use crate::domain::user::{EmailAddress, UserId};
    use std::collections::BTreeSet;

    fn identity_with(roles: BTreeSet<Role>) -> Identity {
        let now = Utc::now();
        Identity {
            user_id: UserId::random(),
            email: EmailAddress::new("ada@example.com").expect("email"),
            roles,
            issued_at: now,
            expires_at: now + chrono::Duration::hours(24),
        }
    }

    fn create_request() -> CreateRestaurantRequest {
        CreateRestaurantRequest {
            name: "Chez Test".to_owned(),
            payment_types: BTreeSet::from([PaymentType::Cash]),
            tags: BTreeSet::from(["bistro".to_owned()]),
            pictures: Vec::new(),
            menu_groups: Vec::new(),
        }
    }

    fn service(
        restaurants: MockRestaurantRepository,
    ) -> RestaurantsService<MockUserRepository, MockRestaurantRepository, MockReviewRepository>
    {
        let users = Arc::new(MockUserRepository::new());
        let restaurants = Arc::new(restaurants);
        let reviews = Arc::new(MockReviewRepository::new());
        let references = Arc::new(ReferenceCoordinator::new(
            users,
            Arc::clone(&restaurants),
            reviews,
        ));
        RestaurantsService::new(restaurants, references)
    }

    #[tokio::test]
    async fn create_requires_the_admin_role() {
        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_insert().times(0);

        let identity = identity_with(BTreeSet::from([Role::User]));
        let error = service(restaurants)
            .create(&identity, create_request())
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn admins_create_restaurants_with_zero_aggregates() {
        let mut restaurants = MockRestaurantRepository::new();
        restaurants
            .expect_insert()
            .times(1)
            .withf(|restaurant| {
                restaurant.average_score == 0.0 && restaurant.average_price == 0.0
            })
            .returning(|_| Ok(()));

        let identity = identity_with(BTreeSet::from([Role::Admin]));
        let created = service(restaurants)
            .create(&identity, create_request())
            .await
            .expect("create succeeds");
        assert_eq!(created.name, "Chez Test");
    }

    #[tokio::test]
    async fn update_rejects_empty_tag_sets() {
        let stored = Restaurant::new(
            "Chez Test",
            BTreeSet::from([PaymentType::Cash]),
            BTreeSet::from(["bistro".to_owned()]),
            Vec::new(),
            Vec::new(),
        )
        .expect("valid restaurant");
        let stored_id = stored.id;

        let mut restaurants = MockRestaurantRepository::new();
        restaurants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        restaurants.expect_update().times(0);

        let identity = identity_with(BTreeSet::from([Role::Admin]));
        let request = UpdateRestaurantRequest {
            name: "Chez Test".to_owned(),
            payment_types: BTreeSet::from([PaymentType::Cash]),
            tags: BTreeSet::new(),
            pictures: None,
            menu_groups: None,
        };
        let error = service(restaurants)
            .update(&identity, &stored_id, request)
            .await
            .expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn delete_of_a_missing_restaurant_is_not_found() {
        let mut restaurants = MockRestaurantRepository::new();
        restaurants.expect_find_by_id().returning(|_| Ok(None));
        restaurants.expect_delete().times(0);

        let identity = identity_with(BTreeSet::from([Role::Admin]));
        let error = service(restaurants)
            .delete(&identity, &RestaurantId::random())
            .await
            .expect_err("not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
