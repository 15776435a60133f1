//! Account use-cases: sign-up, sign-in, profile reads and writes, deletion
//! with its cascade.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::aggregates::Aggregates;
use super::error::Error;
use super::identity::Identity;
use super::ports::{
    AccountsCommand, AccountsQuery, LoginService, PasswordHasher, RestaurantRepository,
    ReviewRepository, SignInRequest, SignUpRequest, SignedCredential, TokenCodec,
    UpdateProfileRequest, UserProfile, UserRepository,
};
use super::references::ReferenceCoordinator;
use super::restaurant::Restaurant;
use super::review::Review;
use super::user::{User, UserId};

/// Account service implementing the driving ports.
pub struct AccountsService<U, R, V, H, T> {
    users: Arc<U>,
    restaurants: Arc<R>,
    reviews: Arc<V>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    references: Arc<ReferenceCoordinator<U, R, V>>,
    aggregates: Arc<Aggregates<R, V>>,
}

impl<U, R, V, H, T> AccountsService<U, R, V, H, T> {
    /// Create the service over shared repositories, adapters and core
    /// services.
    pub fn new(
        users: Arc<U>,
        restaurants: Arc<R>,
        reviews: Arc<V>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        references: Arc<ReferenceCoordinator<U, R, V>>,
        aggregates: Arc<Aggregates<R, V>>,
    ) -> Self {
        Self {
            users,
            restaurants,
            reviews,
            hasher,
            tokens,
            references,
            aggregates,
        }
    }
}

impl<U, R, V, H, T> AccountsService<U, R, V, H, T>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    /// Resolve the documents a user's reference lists point at.
    ///
    /// Dangling ids are skipped rather than failing the read; they only
    /// appear inside the window of a cascade that is still in flight.
    async fn expand(&self, user: User) -> Result<UserProfile, Error> {
        let mut likes: Vec<Restaurant> = Vec::with_capacity(user.likes.len());
        for restaurant_id in &user.likes {
            if let Some(restaurant) = self.restaurants.find_by_id(restaurant_id).await? {
                likes.push(restaurant);
            }
        }
        let mut reviews: Vec<Review> = Vec::with_capacity(user.reviews.len());
        for review_id in &user.reviews {
            if let Some(review) = self.reviews.find_by_id(review_id).await? {
                reviews.push(review);
            }
        }
        Ok(UserProfile {
            user,
            likes,
            reviews,
        })
    }
}

#[async_trait]
impl<U, R, V, H, T> AccountsCommand for AccountsService<U, R, V, H, T>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn sign_up(&self, request: SignUpRequest) -> Result<User, Error> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(Error::conflict(format!(
                "email {} is already registered",
                request.email
            )));
        }

        let digest = self.hasher.hash(&request.password)?;
        let user = User::new(
            request.first_name,
            request.last_name,
            request.email,
            digest,
            request.roles,
        );
        self.users.insert(&user).await?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    async fn update_profile(
        &self,
        identity: &Identity,
        id: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, Error> {
        identity.require_owner(id)?;

        let mut user = self.load(id).await?;
        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        if let Some(password) = request.password {
            user.password = self.hasher.hash(&password)?;
        }
        if let Some(roles) = request.roles {
            if !roles.is_empty() {
                user.roles = roles;
            }
        }
        user.updated_at = Utc::now();
        self.users.update(&user).await?;
        Ok(user)
    }

    async fn delete_account(&self, identity: &Identity, id: &UserId) -> Result<(), Error> {
        let user = self.load(id).await?;
        self.users.delete(id).await?;
        let affected = self.references.purge_user(&user).await?;
        for restaurant_id in &affected {
            self.aggregates.recompute(restaurant_id).await?;
        }
        info!(user_id = %id, actor_id = %identity.user_id, "account deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, R, V, H, T> AccountsQuery for AccountsService<U, R, V, H, T>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn get(&self, id: &UserId) -> Result<UserProfile, Error> {
        let user = self.load(id).await?;
        self.expand(user).await
    }

    async fn list(&self) -> Result<Vec<UserProfile>, Error> {
        let users = self.users.list().await?;
        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            profiles.push(self.expand(user).await?);
        }
        Ok(profiles)
    }
}

#[async_trait]
impl<U, R, V, H, T> LoginService for AccountsService<U, R, V, H, T>
where
    U: UserRepository,
    R: RestaurantRepository,
    V: ReviewRepository,
    H: PasswordHasher,
    T: TokenCodec,
{
    async fn sign_in(&self, request: SignInRequest) -> Result<SignedCredential, Error> {
        let Some(user) = self.users.find_by_email(&request.email).await? else {
            return Err(Error::not_found(format!(
                "user with email {} not found",
                request.email
            )));
        };
        if !self.hasher.verify(&request.password, &user.password)? {
            return Err(Error::unauthorized("invalid password"));
        }
        let token = self.tokens.issue(&user)?;
        Ok(SignedCredential { token })
    }
}
