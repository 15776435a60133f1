//! Driving ports for account use-cases.
//!
//! Inbound adapters call these to run sign-up/sign-in and profile
//! operations without knowing the backing infrastructure.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::restaurant::Restaurant;
use crate::domain::review::Review;
use crate::domain::user::{EmailAddress, PersonName, RawPassword, Role, User, UserId};

/// Validated sign-up payload.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Unique sign-in address.
    pub email: EmailAddress,
    /// Raw password to be digested.
    pub password: RawPassword,
    /// Requested roles; empty means the default `{user}`.
    pub roles: BTreeSet<Role>,
}

/// Validated profile update payload. Absent fields stay unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    /// New given name.
    pub first_name: Option<PersonName>,
    /// New family name.
    pub last_name: Option<PersonName>,
    /// New raw password, re-digested on update.
    pub password: Option<RawPassword>,
    /// New role set.
    pub roles: Option<BTreeSet<Role>>,
}

/// Validated sign-in payload.
#[derive(Debug, Clone)]
pub struct SignInRequest {
    /// Sign-in address.
    pub email: EmailAddress,
    /// Raw password to check against the stored digest.
    pub password: RawPassword,
}

/// Signed credential returned by a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedCredential {
    /// Compact encoded bearer token.
    pub token: String,
}

/// A user with its referenced documents expanded.
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// The user document.
    pub user: User,
    /// Liked restaurants, resolved in like order.
    pub likes: Vec<Restaurant>,
    /// Authored reviews, resolved in creation order.
    pub reviews: Vec<Review>,
}

/// Domain use-case port for account mutations.
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register a new account. Fails with `Conflict` on a duplicate email.
    async fn sign_up(&self, request: SignUpRequest) -> Result<User, Error>;

    /// Update a profile. Only the account owner may do this.
    async fn update_profile(
        &self,
        identity: &Identity,
        id: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, Error>;

    /// Delete an account and cascade the removal of its reviews and
    /// references.
    async fn delete_account(&self, identity: &Identity, id: &UserId) -> Result<(), Error>;
}

/// Domain use-case port for account reads.
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Fetch one user with likes and reviews expanded.
    async fn get(&self, id: &UserId) -> Result<UserProfile, Error>;

    /// All users with references expanded, most recently updated first.
    async fn list(&self) -> Result<Vec<UserProfile>, Error>;
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a signed bearer token.
    async fn sign_in(&self, request: SignInRequest) -> Result<SignedCredential, Error>;
}
