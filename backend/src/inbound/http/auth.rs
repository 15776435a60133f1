//! Bearer-credential extraction for HTTP handlers.
//!
//! The identity is resolved once here and passed explicitly into the domain
//! services; handlers for public routes simply do not take the extractor.

use actix_web::http::header;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use actix_web::web;
use futures_util::future::{ready, Ready};

use crate::domain::{Error, Identity};

use super::state::HttpState;

/// Extractor resolving the acting [`Identity`] from an
/// `Authorization: Bearer` header. Missing, malformed, foreign-signed or
/// expired credentials all fail with `Unauthorized`.
pub struct BearerIdentity(pub Identity);

impl BearerIdentity {
    /// The resolved identity.
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

fn resolve(req: &HttpRequest) -> Result<Identity, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state not configured"))?;
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer credential"))?;
    let raw = header_value
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let token = raw
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("expected a bearer credential"))?;
    Ok(state.tokens.decode(token)?)
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req).map(BearerIdentity))
    }
}
