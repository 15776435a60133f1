//! User entity and its value types.
//!
//! The password digest never leaves the domain: response DTOs are built from
//! accessors that do not expose it, and the raw password is zeroized once
//! hashed.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::restaurant::RestaurantId;
use super::review::ReviewId;

/// Validation errors returned by the user value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// First or last name was missing or blank once trimmed.
    EmptyName,
    /// Email was blank or not shaped like `local@domain`.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = Uuid)]
pub struct UserId(Uuid);

impl UserId {
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Trimmed, non-empty person name (first or last).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name from raw input.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Lower-cased email address with a minimal `local@domain` shape check.
///
/// Full RFC validation stays at the HTTP boundary; the domain only rules out
/// values that could never address a mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address from raw input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = email.as_ref().trim().to_lowercase();
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Authorization role attached to a user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage restaurants.
    Admin,
    /// Default role for every account.
    User,
}

/// Raw password as received from a client, zeroized on drop.
#[derive(Debug, Clone)]
pub struct RawPassword(Zeroizing<String>);

impl RawPassword {
    /// Validate and construct a raw password.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(password)))
    }

    /// Expose the secret for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored password digest. Opaque to the domain; produced and checked by the
/// hasher port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed digest.
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Digest string as stored.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Application user document.
///
/// ## Invariants
/// - `email` is unique across the user collection (enforced at sign-up).
/// - `likes` holds ids of restaurants that currently exist, each at most
///   once.
/// - `reviews` holds exactly the ids of reviews whose owner is this user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Unique sign-in address.
    pub email: EmailAddress,
    /// Password digest; never serialized in responses.
    pub password: PasswordHash,
    /// Granted roles; never empty.
    pub roles: BTreeSet<Role>,
    /// Restaurants this user likes, in like order.
    pub likes: Vec<RestaurantId>,
    /// Reviews authored by this user, in creation order.
    pub reviews: Vec<ReviewId>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user document with empty reference lists.
    ///
    /// An empty `roles` set is widened to `{user}` so every account carries
    /// at least the default role.
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        email: EmailAddress,
        password: PasswordHash,
        roles: BTreeSet<Role>,
    ) -> Self {
        let roles = if roles.is_empty() {
            BTreeSet::from([Role::User])
        } else {
            roles
        };
        let now = Utc::now();
        Self {
            id: UserId::random(),
            first_name,
            last_name,
            email,
            password,
            roles,
            likes: Vec::new(),
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user carries `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", "ada@example.com")]
    #[case("  Ada@Example.COM  ", "ada@example.com")]
    fn email_is_trimmed_and_lowercased(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@domain")]
    #[case("local@")]
    #[case("a@b@c")]
    fn malformed_emails_are_rejected(#[case] raw: &str) {
        assert_eq!(
            EmailAddress::new(raw),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(#[case] raw: &str) {
        assert_eq!(PersonName::new(raw), Err(UserValidationError::EmptyName));
    }

    #[test]
    fn new_user_defaults_to_the_user_role() {
        let user = User::new(
            PersonName::new("Ada").expect("name"),
            PersonName::new("Lovelace").expect("name"),
            EmailAddress::new("ada@example.com").expect("email"),
            PasswordHash::new("digest"),
            BTreeSet::new(),
        );
        assert!(user.has_role(Role::User));
        assert!(!user.has_role(Role::Admin));
        assert!(user.likes.is_empty());
        assert!(user.reviews.is_empty());
    }
}
