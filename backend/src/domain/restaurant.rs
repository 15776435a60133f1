//! Restaurant entity and its value types.
//!
//! `average_score` and `average_price` are derived fields. Nothing outside
//! the aggregate service writes them; API input never carries them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::review::{Price, ReviewId};

/// Validation errors returned by the restaurant value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestaurantValidationError {
    /// Restaurant name was missing or blank once trimmed.
    EmptyName,
    /// No payment type was given.
    NoPaymentTypes,
    /// No tag was given.
    NoTags,
    /// A tag was blank once trimmed.
    EmptyTag,
    /// A menu group title was blank once trimmed.
    EmptyMenuGroupTitle,
    /// A menu item label was blank once trimmed.
    EmptyMenuItemLabel,
}

impl fmt::Display for RestaurantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "restaurant name must not be empty"),
            Self::NoPaymentTypes => write!(f, "at least one payment type is required"),
            Self::NoTags => write!(f, "at least one tag is required"),
            Self::EmptyTag => write!(f, "tags must not be empty"),
            Self::EmptyMenuGroupTitle => write!(f, "menu group titles must not be empty"),
            Self::EmptyMenuItemLabel => write!(f, "menu item labels must not be empty"),
        }
    }
}

impl std::error::Error for RestaurantValidationError {}

/// Stable restaurant identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = Uuid)]
pub struct RestaurantId(Uuid);

impl RestaurantId {
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

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RestaurantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Accepted payment method.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Physical currency.
    Cash,
    /// Debit or credit card.
    Card,
    /// Meal voucher.
    Voucher,
}

/// Named item inside a menu group.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroupItem {
    /// Item label shown on the menu.
    pub label: String,
    /// Optional price; menus may list items without one.
    pub price: Option<Price>,
}

impl MenuGroupItem {
    /// Validate and construct an item.
    pub fn new(
        label: impl Into<String>,
        price: Option<Price>,
    ) -> Result<Self, RestaurantValidationError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(RestaurantValidationError::EmptyMenuItemLabel);
        }
        Ok(Self { label, price })
    }
}

/// Titled section of a restaurant menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroup {
    /// Section title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Items in menu order.
    pub items: Vec<MenuGroupItem>,
    /// Whether the restaurant highlights this group.
    pub pinned: bool,
}

impl MenuGroup {
    /// Validate and construct a group.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        items: Vec<MenuGroupItem>,
        pinned: bool,
    ) -> Result<Self, RestaurantValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(RestaurantValidationError::EmptyMenuGroupTitle);
        }
        Ok(Self {
            title,
            description,
            items,
            pinned,
        })
    }
}

/// Validated non-empty tag set.
pub fn validate_tags(tags: BTreeSet<String>) -> Result<BTreeSet<String>, RestaurantValidationError> {
    if tags.is_empty() {
        return Err(RestaurantValidationError::NoTags);
    }
    if tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(RestaurantValidationError::EmptyTag);
    }
    Ok(tags)
}

/// Restaurant document.
///
/// ## Invariants
/// - `reviews` holds exactly the ids of reviews whose restaurant is this
///   one.
/// - `average_score` / `average_price` equal the means over that review set
///   (0 when the relevant set is empty); only the aggregate service writes
///   them.
/// - `pinned_review`, when set, identifies a review of this restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// Stable identifier.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Accepted payment methods; never empty.
    pub payment_types: BTreeSet<PaymentType>,
    /// Classification tags; never empty.
    pub tags: BTreeSet<String>,
    /// Picture URLs.
    pub pictures: Vec<String>,
    /// Menu sections in display order.
    pub menu_groups: Vec<MenuGroup>,
    /// Mean review score, 0–10; derived.
    pub average_score: f64,
    /// Mean of the review prices that are present; derived.
    pub average_price: f64,
    /// Highlighted review, if any.
    pub pinned_review: Option<ReviewId>,
    /// Reviews of this restaurant, in creation order.
    pub reviews: Vec<ReviewId>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Build a fresh restaurant with zeroed aggregates and no reviews.
    pub fn new(
        name: impl Into<String>,
        payment_types: BTreeSet<PaymentType>,
        tags: BTreeSet<String>,
        pictures: Vec<String>,
        menu_groups: Vec<MenuGroup>,
    ) -> Result<Self, RestaurantValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RestaurantValidationError::EmptyName);
        }
        if payment_types.is_empty() {
            return Err(RestaurantValidationError::NoPaymentTypes);
        }
        let tags = validate_tags(tags)?;
        let now = Utc::now();
        Ok(Self {
            id: RestaurantId::random(),
            name,
            payment_types,
            tags,
            pictures,
            menu_groups,
            average_score: 0.0,
            average_price: 0.0,
            pinned_review: None,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn tags(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn new_restaurant_starts_with_zero_aggregates() {
        let restaurant = Restaurant::new(
            "Chez Test",
            BTreeSet::from([PaymentType::Card]),
            tags(&["bistro"]),
            Vec::new(),
            Vec::new(),
        )
        .expect("valid restaurant");
        assert_eq!(restaurant.average_score, 0.0);
        assert_eq!(restaurant.average_price, 0.0);
        assert!(restaurant.pinned_review.is_none());
        assert!(restaurant.reviews.is_empty());
    }

    #[rstest]
    #[case("", &["bistro"], RestaurantValidationError::EmptyName)]
    #[case("   ", &["bistro"], RestaurantValidationError::EmptyName)]
    fn blank_names_are_rejected(
        #[case] name: &str,
        #[case] tag_values: &[&str],
        #[case] expected: RestaurantValidationError,
    ) {
        let result = Restaurant::new(
            name,
            BTreeSet::from([PaymentType::Cash]),
            tags(tag_values),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(result.expect_err("must fail"), expected);
    }

    #[test]
    fn empty_payment_types_are_rejected() {
        let result = Restaurant::new(
            "Chez Test",
            BTreeSet::new(),
            tags(&["bistro"]),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(
            result.expect_err("must fail"),
            RestaurantValidationError::NoPaymentTypes
        );
    }

    #[rstest]
    #[case(&[], RestaurantValidationError::NoTags)]
    #[case(&["  "], RestaurantValidationError::EmptyTag)]
    fn bad_tag_sets_are_rejected(
        #[case] tag_values: &[&str],
        #[case] expected: RestaurantValidationError,
    ) {
        assert_eq!(validate_tags(tags(tag_values)).expect_err("must fail"), expected);
    }

    #[test]
    fn menu_groups_reject_blank_titles_and_labels() {
        assert_eq!(
            MenuGroup::new(" ", None, Vec::new(), false).expect_err("must fail"),
            RestaurantValidationError::EmptyMenuGroupTitle
        );
        assert_eq!(
            MenuGroupItem::new("", None).expect_err("must fail"),
            RestaurantValidationError::EmptyMenuItemLabel
        );
    }
}
