//! Acting identity resolved from a bearer credential.
//!
//! The identity is resolved once at request entry and threaded explicitly
//! into every operation that needs an authorization decision; nothing in the
//! domain reaches for ambient request state.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::error::Error;
use super::user::{EmailAddress, Role, UserId};

/// Authenticated principal for the duration of one request.
///
/// ## Invariants
/// - `expires_at` is strictly later than `issued_at`; the token codec
///   refuses to decode expired credentials, so a constructed identity is
///   valid at resolution time.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Subject user id.
    pub user_id: UserId,
    /// Email the credential was issued for.
    pub email: EmailAddress,
    /// Roles granted at issue time.
    pub roles: BTreeSet<Role>,
    /// Credential issue instant.
    pub issued_at: DateTime<Utc>,
    /// Credential expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Fail with `Forbidden` unless the identity carries `role`.
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        if self.roles.contains(&role) {
            Ok(())
        } else {
            Err(Error::forbidden("missing required role"))
        }
    }

    /// Fail with `Forbidden` unless the identity is `owner`.
    pub fn require_owner(&self, owner: &UserId) -> Result<(), Error> {
        if self.user_id == *owner {
            Ok(())
        } else {
            Err(Error::forbidden("not the owner of this resource"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    fn identity(roles: BTreeSet<Role>) -> Identity {
        let now = Utc::now();
        Identity {
            user_id: UserId::random(),
            email: EmailAddress::new("ada@example.com").expect("email"),
            roles,
            issued_at: now,
            expires_at: now + chrono::Duration::hours(24),
        }
    }

    #[test]
    fn require_role_accepts_granted_roles() {
        let id = identity(BTreeSet::from([Role::Admin, Role::User]));
        assert!(id.require_role(Role::Admin).is_ok());
    }

    #[test]
    fn require_role_rejects_missing_roles() {
        let id = identity(BTreeSet::from([Role::User]));
        let error = id.require_role(Role::Admin).expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn require_owner_compares_user_ids() {
        let id = identity(BTreeSet::from([Role::User]));
        let own = id.user_id;
        assert!(id.require_owner(&own).is_ok());
        let error = id.require_owner(&UserId::random()).expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }
}
