//! In-memory document store adapters.
//!
//! One adapter per collection, each a `HashMap` keyed by document id behind
//! an async `RwLock`. Writes take the lock for a single document mutation
//! at a time, so the adapters provide exactly the per-document atomicity
//! the domain assumes of its entity store — multi-document invariants stay
//! with the reference coordinator.

mod restaurants;
mod reviews;
mod users;

pub use restaurants::MemoryRestaurantRepository;
pub use reviews::MemoryReviewRepository;
pub use users::MemoryUserRepository;
