//! Domain entities, ports and core services.
//!
//! The consistency-critical pieces live here: the aggregate service keeps
//! the derived restaurant averages truthful, the reference coordinator owns
//! every cross-document reference mutation, and the identity type carries
//! the per-request authorization checks. Inbound and outbound adapters
//! depend on this module, never the other way around.

pub mod aggregates;
pub mod error;
pub mod identity;
pub mod ports;
pub mod references;
pub mod restaurant;
pub mod review;
pub mod trace_id;
pub mod user;

mod accounts_service;
mod restaurants_service;
mod reviews_service;

pub use self::accounts_service::AccountsService;
pub use self::aggregates::Aggregates;
pub use self::error::{Error, ErrorCode};
pub use self::identity::Identity;
pub use self::references::ReferenceCoordinator;
pub use self::restaurant::{
    MenuGroup, MenuGroupItem, PaymentType, Restaurant, RestaurantId, RestaurantValidationError,
};
pub use self::restaurants_service::RestaurantsService;
pub use self::review::{
    Price, Review, ReviewContent, ReviewId, ReviewValidationError, Score,
};
pub use self::reviews_service::ReviewsService;
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};
pub use self::user::{
    EmailAddress, PasswordHash, PersonName, RawPassword, Role, User, UserId, UserValidationError,
};
