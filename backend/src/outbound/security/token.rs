//! HS256 JWT implementation of the token codec port.
//!
//! Claims carry the subject id, email and roles; validity is 24 hours from
//! issue and expiry is the only invalidation path.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{EmailAddress, Identity, Role, User, UserId};

/// Credential validity window in hours.
const VALIDITY_HOURS: i64 = 24;

/// Wire shape of the signed claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    roles: Vec<Role>,
    iat: i64,
    exp: i64,
}

/// HS256-signed bearer credential codec.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl JwtTokenCodec {
    /// Codec over a shared HS256 secret with the standard 24 h validity.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validity: Duration::hours(VALIDITY_HOURS),
        }
    }

    #[cfg(test)]
    fn with_validity(secret: &[u8], validity: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validity,
        }
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenCodecError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenCodecError::invalid(format!("timestamp {seconds} out of range")))
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user: &User) -> Result<String, TokenCodecError> {
        let now = Utc::now();
        let claims = Claims {
            sub: *user.id.as_uuid(),
            email: user.email.to_string(),
            roles: user.roles.iter().copied().collect(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|error| TokenCodecError::signing(error.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Identity, TokenCodecError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(
            |error| match error.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    TokenCodecError::expired("validity window passed")
                }
                _ => TokenCodecError::invalid(error.to_string()),
            },
        )?;

        let claims = data.claims;
        let email = EmailAddress::new(&claims.email)
            .map_err(|error| TokenCodecError::invalid(error.to_string()))?;
        Ok(Identity {
            user_id: UserId::from_uuid(claims.sub),
            email,
            roles: claims.roles.into_iter().collect::<BTreeSet<Role>>(),
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}
