//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod password_hasher;
mod restaurant_repository;
mod restaurants;
mod review_repository;
mod reviews;
mod token_codec;
mod user_repository;

pub use accounts::{
    AccountsCommand, AccountsQuery, LoginService, SignInRequest, SignUpRequest, SignedCredential,
    UpdateProfileRequest, UserProfile,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
pub use restaurant_repository::{RestaurantRepository, RestaurantRepositoryError};
pub use restaurants::{
    CreateRestaurantRequest, RestaurantsCommand, RestaurantsQuery, UpdateRestaurantRequest,
};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
pub use reviews::{CreateReviewRequest, ReviewsCommand, ReviewsQuery, UpdateReviewRequest};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
