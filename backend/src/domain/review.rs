//! Review entity and its value types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::restaurant::RestaurantId;
use super::user::UserId;

/// Validation errors returned by the review value-type constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewValidationError {
    /// Content was missing or blank once trimmed.
    EmptyContent,
    /// Score fell outside the 0–10 range or was not finite.
    ScoreOutOfRange { given: f64 },
    /// Price was negative or not finite.
    InvalidPrice { given: f64 },
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "review content must not be empty"),
            Self::ScoreOutOfRange { given } => {
                write!(f, "score must be between 0 and 10, got {given}")
            }
            Self::InvalidPrice { given } => {
                write!(f, "price must be zero or positive, got {given}")
            }
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Stable review identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = Uuid)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReviewId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Review score, bounded to 0–10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
#[schema(value_type = f64)]
pub struct Score(f64);

impl Score {
    /// Validate and construct a score.
    pub fn new(value: f64) -> Result<Self, ReviewValidationError> {
        if !value.is_finite() || !(0.0..=10.0).contains(&value) {
            return Err(ReviewValidationError::ScoreOutOfRange { given: value });
        }
        Ok(Self(value))
    }

    /// Numeric value.
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = ReviewValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// Non-negative price, in the venue's currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
#[schema(value_type = f64)]
pub struct Price(f64);

impl Price {
    /// Validate and construct a price.
    pub fn new(value: f64) -> Result<Self, ReviewValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ReviewValidationError::InvalidPrice { given: value });
        }
        Ok(Self(value))
    }

    /// Numeric value.
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ReviewValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Non-empty review text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent(String);

impl ReviewContent {
    /// Validate and construct review text.
    pub fn new(content: impl Into<String>) -> Result<Self, ReviewValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ReviewValidationError::EmptyContent);
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for ReviewContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReviewContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Review document.
///
/// ## Invariants
/// - At most one review exists per `(user, restaurant)` pair.
/// - `id` appears in the owning user's `reviews` list and the reviewed
///   restaurant's `reviews` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Stable identifier.
    pub id: ReviewId,
    /// Owning user.
    pub user: UserId,
    /// Reviewed restaurant.
    pub restaurant: RestaurantId,
    /// Review text.
    pub content: ReviewContent,
    /// Score, 0–10.
    pub score: Score,
    /// Amount paid, when the reviewer shared it.
    pub price: Option<Price>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Build a fresh review document.
    pub fn new(
        user: UserId,
        restaurant: RestaurantId,
        content: ReviewContent,
        score: Score,
        price: Option<Price>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReviewId::random(),
            user,
            restaurant,
            content,
            score,
            price,
            created_at: now,
            updated_at: now,
        }
    }
}
