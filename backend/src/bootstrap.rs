//! Composition root: wires adapters into HTTP state and registers routes.
//!
//! `main` and the integration suites share this wiring so both drive the
//! same stack.

use std::sync::Arc;

use actix_web::web;

use crate::domain::{
    AccountsService, Aggregates, ReferenceCoordinator, RestaurantsService, ReviewsService,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{health, restaurants, reviews, users};
use crate::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};
use crate::outbound::store::{
    MemoryRestaurantRepository, MemoryReviewRepository, MemoryUserRepository,
};

/// Build an [`HttpState`] over fresh in-memory collections, signing
/// credentials with `secret`.
pub fn memory_state(secret: &[u8]) -> HttpState {
    memory_state_with_hasher(secret, BcryptPasswordHasher::new())
}

/// As [`memory_state`], with an explicit hasher. Tests pass a minimum-cost
/// hasher to keep sign-up fast.
pub fn memory_state_with_hasher(secret: &[u8], hasher: BcryptPasswordHasher) -> HttpState {
    let users = Arc::new(MemoryUserRepository::new());
    let restaurants = Arc::new(MemoryRestaurantRepository::new());
    let reviews = Arc::new(MemoryReviewRepository::new());
    let hasher = Arc::new(hasher);
    let tokens = Arc::new(JwtTokenCodec::from_secret(secret));

    let references = Arc::new(ReferenceCoordinator::new(
        Arc::clone(&users),
        Arc::clone(&restaurants),
        Arc::clone(&reviews),
    ));
    let aggregates = Arc::new(Aggregates::new(
        Arc::clone(&restaurants),
        Arc::clone(&reviews),
    ));

    let accounts = Arc::new(AccountsService::new(
        Arc::clone(&users),
        Arc::clone(&restaurants),
        Arc::clone(&reviews),
        hasher,
        Arc::clone(&tokens),
        Arc::clone(&references),
        Arc::clone(&aggregates),
    ));
    let restaurants_service = Arc::new(RestaurantsService::new(
        Arc::clone(&restaurants),
        Arc::clone(&references),
    ));
    let reviews_service = Arc::new(ReviewsService::new(
        users,
        restaurants,
        reviews,
        references,
        aggregates,
    ));

    HttpState {
        accounts: accounts.clone(),
        accounts_query: accounts.clone(),
        login: accounts,
        restaurants: restaurants_service.clone(),
        restaurants_query: restaurants_service,
        reviews: reviews_service.clone(),
        reviews_query: reviews_service,
        tokens,
    }
}

/// Register every route of the HTTP surface.
///
/// Fixed-segment routes (`/restaurants/like/{id}`, `/reviews/pin/{id}`,
/// `/reviews/unpin`) come before their parameterised siblings so they win
/// the match.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::index)
        .service(health::ready)
        .service(health::live)
        .service(users::sign_up)
        .service(users::sign_in)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(restaurants::like_restaurant)
        .service(restaurants::dislike_restaurant)
        .service(restaurants::create_restaurant)
        .service(restaurants::list_restaurants)
        .service(restaurants::get_restaurant)
        .service(restaurants::update_restaurant)
        .service(restaurants::delete_restaurant)
        .service(reviews::pin_review)
        .service(reviews::unpin_review)
        .service(reviews::create_review)
        .service(reviews::list_reviews)
        .service(reviews::get_review)
        .service(reviews::update_review)
        .service(reviews::delete_review);
}
