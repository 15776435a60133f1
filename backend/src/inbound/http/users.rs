//! User API handlers.
//!
//! ```text
//! POST   /signup        register
//! POST   /signin        authenticate, returns a bearer credential
//! GET    /users         list with likes/reviews expanded
//! GET    /users/{id}    detail with likes/reviews expanded
//! PATCH  /users/{id}    profile update (self only)
//! DELETE /users/{id}    delete + cascade (authenticated)
//! ```
//!
//! The password digest never appears in any response payload.

use std::collections::BTreeSet;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    SignInRequest, SignUpRequest, UpdateProfileRequest, UserProfile,
};
use crate::domain::{
    EmailAddress, Error, PersonName, RawPassword, RestaurantId, ReviewId, Role, User, UserId,
    UserValidationError,
};

use super::auth::BearerIdentity;
use super::restaurants::RestaurantResponse;
use super::reviews::ReviewResponse;
use super::state::HttpState;
use super::ApiResult;

fn map_user_validation(field: &str, error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// User representation without reference expansion.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Sign-in address.
    pub email: String,
    /// Granted roles.
    pub roles: Vec<Role>,
    /// Liked restaurant ids.
    pub likes: Vec<RestaurantId>,
    /// Authored review ids.
    pub reviews: Vec<ReviewId>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            email: user.email.to_string(),
            roles: user.roles.into_iter().collect(),
            likes: user.likes,
            reviews: user.reviews,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User representation with likes and reviews expanded to full documents.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    /// Stable identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Sign-in address.
    pub email: String,
    /// Granted roles.
    pub roles: Vec<Role>,
    /// Liked restaurants, expanded.
    pub likes: Vec<RestaurantResponse>,
    /// Authored reviews, expanded.
    pub reviews: Vec<ReviewResponse>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile {
            user,
            likes,
            reviews,
        } = profile;
        Self {
            id: user.id,
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            email: user.email.to_string(),
            roles: user.roles.into_iter().collect(),
            likes: likes.into_iter().map(RestaurantResponse::from).collect(),
            reviews: reviews.into_iter().map(ReviewResponse::from).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Sign-up payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SignUpBody {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique sign-in address.
    pub email: String,
    /// Raw password.
    pub password: String,
    /// Requested roles; defaults to `["user"]`.
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl TryFrom<SignUpBody> for SignUpRequest {
    type Error = Error;

    fn try_from(body: SignUpBody) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: PersonName::new(&body.first_name)
                .map_err(|error| map_user_validation("firstName", error))?,
            last_name: PersonName::new(&body.last_name)
                .map_err(|error| map_user_validation("lastName", error))?,
            email: EmailAddress::new(&body.email)
                .map_err(|error| map_user_validation("email", error))?,
            password: RawPassword::new(body.password)
                .map_err(|error| map_user_validation("password", error))?,
            roles: body.roles.into_iter().collect::<BTreeSet<Role>>(),
        })
    }
}

/// Sign-in payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SignInBody {
    /// Sign-in address.
    pub email: String,
    /// Raw password.
    pub password: String,
}

/// Sign-in response carrying the bearer credential.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Signed bearer token, valid for 24 hours.
    pub access_token: String,
}

/// Profile update payload; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct UpdateUserBody {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New raw password.
    pub password: Option<String>,
    /// New role set.
    pub roles: Option<Vec<Role>>,
}

impl TryFrom<UpdateUserBody> for UpdateProfileRequest {
    type Error = Error;

    fn try_from(body: UpdateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: body
                .first_name
                .map(|name| PersonName::new(&name))
                .transpose()
                .map_err(|error| map_user_validation("firstName", error))?,
            last_name: body
                .last_name
                .map(|name| PersonName::new(&name))
                .transpose()
                .map_err(|error| map_user_validation("lastName", error))?,
            password: body
                .password
                .map(RawPassword::new)
                .transpose()
                .map_err(|error| map_user_validation("password", error))?,
            roles: body
                .roles
                .map(|roles| roles.into_iter().collect::<BTreeSet<Role>>()),
        })
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignUpBody,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpBody>,
) -> ApiResult<HttpResponse> {
    let request = SignUpRequest::try_from(payload.into_inner())?;
    let user = state.accounts.sign_up(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and obtain a bearer credential.
///
/// The token is also echoed in the `authorization` response header.
#[utoipa::path(
    post,
    path = "/signin",
    request_body = SignInBody,
    responses(
        (status = 200, description = "Credential issued", body = SignInResponse),
        (status = 401, description = "Wrong password", body = Error),
        (status = 404, description = "Unknown email", body = Error)
    ),
    tags = ["users"],
    operation_id = "signIn",
    security([])
)]
#[post("/signin")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    payload: web::Json<SignInBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = SignInRequest {
        email: EmailAddress::new(&body.email)
            .map_err(|error| map_user_validation("email", error))?,
        password: RawPassword::new(body.password)
            .map_err(|error| map_user_validation("password", error))?,
    };
    let credential = state.login.sign_in(request).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("authorization", credential.token.clone()))
        .json(SignInResponse {
            access_token: credential.token,
        }))
}

/// List users with their references expanded.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "Users", body = [UserProfileResponse])),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserProfileResponse>>> {
    let profiles = state.accounts_query.list().await?;
    Ok(web::Json(
        profiles.into_iter().map(UserProfileResponse::from).collect(),
    ))
}

/// Fetch one user with references expanded.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserProfileResponse),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserProfileResponse>> {
    let id = UserId::from_uuid(path.into_inner());
    let profile = state.accounts_query.get(&id).await?;
    Ok(web::Json(UserProfileResponse::from(profile)))
}

/// Update a profile (self only).
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Not this account's owner", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::from_uuid(path.into_inner());
    let request = UpdateProfileRequest::try_from(payload.into_inner())?;
    let user = state
        .accounts
        .update_profile(&identity.0, &id, request)
        .await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete an account and cascade its reviews and references.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = UserId::from_uuid(path.into_inner());
    state.accounts.delete_account(&identity.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::PasswordHash;
    use rstest::rstest;

    fn sign_up_body() -> SignUpBody {
        SignUpBody {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "hunter2".to_owned(),
            roles: Vec::new(),
        }
    }

    #[rstest]
    #[case("", "email")]
    #[case("not-an-email", "email")]
    fn invalid_emails_map_to_field_details(#[case] email: &str, #[case] field: &str) {
        let mut body = sign_up_body();
        body.email = email.to_owned();
        let error = SignUpRequest::try_from(body).expect_err("invalid");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        assert_eq!(details["field"], field);
    }

    #[test]
    fn responses_never_contain_the_password_digest() {
        let user = User::new(
            PersonName::new("Ada").expect("name"),
            PersonName::new("Lovelace").expect("name"),
            EmailAddress::new("ada@example.com").expect("email"),
            PasswordHash::new("digest"),
            BTreeSet::new(),
        );
        let value = serde_json::to_value(UserResponse::from(user)).expect("json");
        let rendered = value.to_string();
        assert!(!rendered.contains("digest"));
        assert!(value.get("password").is_none());
    }

    #[test]
    fn unknown_sign_up_fields_are_rejected() {
        let raw = json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "hunter2",
            "likes": ["sneaky"]
        });
        let result: Result<SignUpBody, _> = serde_json::from_value(raw);
        assert!(result.is_err(), "reference lists are server-managed");
    }
}
