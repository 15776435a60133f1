//! Bcrypt implementation of the password hasher port.

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, RawPassword};

/// Bcrypt-backed password hasher.
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with the library's default cost.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Hasher with an explicit cost. Tests use the minimum cost to stay
    /// fast; production keeps the default.
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &RawPassword) -> Result<PasswordHash, PasswordHasherError> {
        bcrypt::hash(password.expose(), self.cost)
            .map(PasswordHash::new)
            .map_err(|error| PasswordHasherError::digest(error.to_string()))
    }

    fn verify(
        &self,
        password: &RawPassword,
        digest: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        bcrypt::verify(password.expose(), digest.as_str())
            .map_err(|error| PasswordHasherError::digest(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        // bcrypt's MIN_COST (== 4) is private in this version; use its value.
        let hasher = BcryptPasswordHasher::with_cost(4);
        let password = RawPassword::new("hunter2").expect("password");
        let digest = hasher.hash(&password).expect("hash");
        assert!(hasher.verify(&password, &digest).expect("verify"));

        let wrong = RawPassword::new("hunter3").expect("password");
        assert!(!hasher.verify(&wrong, &digest).expect("verify"));
    }

    #[test]
    fn malformed_digests_error_instead_of_matching() {
        // bcrypt's MIN_COST (== 4) is private in this version; use its value.
        let hasher = BcryptPasswordHasher::with_cost(4);
        let password = RawPassword::new("hunter2").expect("password");
        let result = hasher.verify(&password, &PasswordHash::new("not-a-digest"));
        assert!(result.is_err());
    }
}
