//! Port abstraction for password digest adapters.

use crate::domain::user::{PasswordHash, RawPassword};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hasher adapters.
    pub enum PasswordHasherError {
        /// Digest computation or parsing failed.
        Digest => "password digest failed: {message}",
    }
}

impl From<PasswordHasherError> for crate::domain::error::Error {
    fn from(error: PasswordHasherError) -> Self {
        let PasswordHasherError::Digest { message } = error;
        Self::internal(format!("password digest failed: {message}"))
    }
}

/// Driven port producing and checking password digests.
///
/// Hashing is CPU-light at the chosen cost and runs inline; the port stays
/// synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Digest a raw password for storage.
    fn hash(&self, password: &RawPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Whether `password` matches the stored `digest`.
    fn verify(
        &self,
        password: &RawPassword,
        digest: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
