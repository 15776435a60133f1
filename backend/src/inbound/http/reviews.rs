//! Review API handlers.
//!
//! ```text
//! POST   /reviews            create (authenticated; owner = acting user)
//! GET    /reviews            list
//! GET    /reviews/{id}       detail
//! PATCH  /reviews/{id}       partial update (owner)
//! DELETE /reviews/{id}       delete (owner)
//! PATCH  /reviews/pin/{id}   pin onto its restaurant (authenticated)
//! PATCH  /reviews/unpin      clear a restaurant's pin (authenticated)
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{CreateReviewRequest, UpdateReviewRequest};
use crate::domain::{
    Error, Price, RestaurantId, Review, ReviewContent, ReviewId, Score, UserId,
};

use super::auth::BearerIdentity;
use super::restaurants::RestaurantResponse;
use super::state::HttpState;
use super::ApiResult;

/// Review representation returned by every review endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// Stable identifier.
    pub id: ReviewId,
    /// Owning user.
    pub user: UserId,
    /// Reviewed restaurant.
    pub restaurant: RestaurantId,
    /// Review text.
    pub content: String,
    /// Score, 0–10.
    pub score: f64,
    /// Amount paid, if shared.
    pub price: Option<f64>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user: review.user,
            restaurant: review.restaurant,
            content: review.content.to_string(),
            score: review.score.value(),
            price: review.price.map(|price| price.value()),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

fn map_validation(error: impl std::fmt::Display) -> Error {
    Error::invalid_request(error.to_string())
}

/// Create payload. The owner comes from the bearer credential.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CreateReviewBody {
    /// Reviewed restaurant id.
    pub restaurant_id: Uuid,
    /// Review text.
    pub content: String,
    /// Score, 0–10.
    pub score: f64,
    /// Amount paid.
    pub price: Option<f64>,
}

impl TryFrom<CreateReviewBody> for CreateReviewRequest {
    type Error = Error;

    fn try_from(body: CreateReviewBody) -> Result<Self, Self::Error> {
        Ok(Self {
            restaurant: RestaurantId::from_uuid(body.restaurant_id),
            content: ReviewContent::new(body.content).map_err(map_validation)?,
            score: Score::new(body.score).map_err(map_validation)?,
            price: body.price.map(Price::new).transpose().map_err(map_validation)?,
        })
    }
}

/// Partial update payload; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct UpdateReviewBody {
    /// New review text.
    pub content: Option<String>,
    /// New score.
    pub score: Option<f64>,
    /// New price.
    pub price: Option<f64>,
}

impl TryFrom<UpdateReviewBody> for UpdateReviewRequest {
    type Error = Error;

    fn try_from(body: UpdateReviewBody) -> Result<Self, Self::Error> {
        Ok(Self {
            content: body
                .content
                .map(ReviewContent::new)
                .transpose()
                .map_err(map_validation)?,
            score: body.score.map(Score::new).transpose().map_err(map_validation)?,
            price: body.price.map(Price::new).transpose().map_err(map_validation)?,
        })
    }
}

/// Body naming the restaurant a pin/unpin applies to.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct PinTargetBody {
    /// Restaurant whose pin is being set or cleared.
    pub restaurant_id: Uuid,
}

/// Create a review owned by the acting user.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewBody,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 404, description = "Unknown user or restaurant", body = Error),
        (status = 409, description = "User already reviewed this restaurant", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<CreateReviewBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateReviewRequest::try_from(payload.into_inner())?;
    let review = state.reviews.create(&identity.0, request).await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

/// List reviews, most recently updated first.
#[utoipa::path(
    get,
    path = "/reviews",
    responses((status = 200, description = "Reviews", body = [ReviewResponse])),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let reviews = state.reviews_query.list().await?;
    Ok(web::Json(
        reviews.into_iter().map(ReviewResponse::from).collect(),
    ))
}

/// Fetch one review.
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 404, description = "Unknown review", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "getReview",
    security([])
)]
#[get("/reviews/{id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let id = ReviewId::from_uuid(path.into_inner());
    let review = state.reviews_query.get(&id).await?;
    Ok(web::Json(ReviewResponse::from(review)))
}

/// Partially update a review (owner only).
#[utoipa::path(
    patch,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    request_body = UpdateReviewBody,
    responses(
        (status = 200, description = "Updated review", body = ReviewResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Not the review owner", body = Error),
        (status = 404, description = "Unknown review", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[patch("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateReviewBody>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let id = ReviewId::from_uuid(path.into_inner());
    let request = UpdateReviewRequest::try_from(payload.into_inner())?;
    let review = state.reviews.update(&identity.0, &id, request).await?;
    Ok(web::Json(ReviewResponse::from(review)))
}

/// Delete a review (owner only).
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not the review owner", body = Error),
        (status = 404, description = "Unknown review", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = ReviewId::from_uuid(path.into_inner());
    state.reviews.delete(&identity.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Pin a review on its restaurant. The review must belong to the
/// restaurant named in the body.
#[utoipa::path(
    patch,
    path = "/reviews/pin/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    request_body = PinTargetBody,
    responses(
        (status = 200, description = "Restaurant with the pin set", body = RestaurantResponse),
        (status = 404, description = "Unknown restaurant or review", body = Error),
        (status = 409, description = "Review belongs to another restaurant", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "pinReview"
)]
#[patch("/reviews/pin/{id}")]
pub async fn pin_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
    payload: web::Json<PinTargetBody>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    let review_id = ReviewId::from_uuid(path.into_inner());
    let restaurant_id = RestaurantId::from_uuid(payload.restaurant_id);
    let restaurant = state
        .reviews
        .pin(&identity.0, &restaurant_id, &review_id)
        .await?;
    Ok(web::Json(RestaurantResponse::from(restaurant)))
}

/// Clear a restaurant's pinned review. Idempotent.
#[utoipa::path(
    patch,
    path = "/reviews/unpin",
    request_body = PinTargetBody,
    responses(
        (status = 200, description = "Restaurant with the pin cleared", body = RestaurantResponse),
        (status = 404, description = "Unknown restaurant", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "unpinReview"
)]
#[patch("/reviews/unpin")]
pub async fn unpin_review(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<PinTargetBody>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    let restaurant_id = RestaurantId::from_uuid(payload.restaurant_id);
    let restaurant = state.reviews.unpin(&identity.0, &restaurant_id).await?;
    Ok(web::Json(RestaurantResponse::from(restaurant)))
}
