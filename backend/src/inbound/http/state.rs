//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, LoginService, RestaurantsCommand, RestaurantsQuery,
    ReviewsCommand, ReviewsQuery, TokenCodec,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account mutations.
    pub accounts: Arc<dyn AccountsCommand>,
    /// Account reads with reference expansion.
    pub accounts_query: Arc<dyn AccountsQuery>,
    /// Sign-in.
    pub login: Arc<dyn LoginService>,
    /// Restaurant mutations.
    pub restaurants: Arc<dyn RestaurantsCommand>,
    /// Restaurant reads.
    pub restaurants_query: Arc<dyn RestaurantsQuery>,
    /// Review mutations.
    pub reviews: Arc<dyn ReviewsCommand>,
    /// Review reads.
    pub reviews_query: Arc<dyn ReviewsQuery>,
    /// Credential verification for the bearer extractor.
    pub tokens: Arc<dyn TokenCodec>,
}
