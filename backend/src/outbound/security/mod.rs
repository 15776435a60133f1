//! Security adapters: password digests and the bearer credential codec.

mod password;
mod token;

pub use password::BcryptPasswordHasher;
pub use token::JwtTokenCodec;
