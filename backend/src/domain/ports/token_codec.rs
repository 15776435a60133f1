//! Port abstraction for the signed bearer credential codec.
//!
//! A credential is issued at sign-in, stays valid until its expiry instant,
//! and has no other invalidation path (no revocation list).

use crate::domain::identity::Identity;
use crate::domain::user::User;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token codec adapters.
    pub enum TokenCodecError {
        /// The credential could not be signed.
        Signing => "credential signing failed: {message}",
        /// The credential is malformed or its signature does not verify.
        Invalid => "credential rejected: {message}",
        /// The credential's validity window has passed.
        Expired => "credential expired: {message}",
    }
}

impl From<TokenCodecError> for crate::domain::error::Error {
    fn from(error: TokenCodecError) -> Self {
        match error {
            TokenCodecError::Signing { message } => {
                Self::internal(format!("credential signing failed: {message}"))
            }
            TokenCodecError::Invalid { .. } => Self::unauthorized("invalid credential"),
            TokenCodecError::Expired { .. } => Self::unauthorized("credential expired"),
        }
    }
}

/// Driven port signing and verifying bearer credentials.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Issue a signed, time-boxed credential for `user`.
    fn issue(&self, user: &User) -> Result<String, TokenCodecError>;

    /// Verify `token` and resolve the identity it asserts.
    fn decode(&self, token: &str) -> Result<Identity, TokenCodecError>;
}
