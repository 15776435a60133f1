//! Restaurant API handlers.
//!
//! ```text
//! POST   /restaurants               create (admin)
//! GET    /restaurants               list
//! GET    /restaurants/{id}          detail
//! PATCH  /restaurants/{id}          update (admin)
//! DELETE /restaurants/{id}          delete + cascade (admin)
//! PATCH  /restaurants/like/{id}     like (authenticated)
//! PATCH  /restaurants/dislike/{id}  dislike (authenticated)
//! ```

use std::collections::BTreeSet;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{CreateRestaurantRequest, UpdateRestaurantRequest};
use crate::domain::{
    Error, MenuGroup, MenuGroupItem, PaymentType, Price, Restaurant, RestaurantId, ReviewId,
};

use super::auth::BearerIdentity;
use super::state::HttpState;
use super::ApiResult;

/// Menu item payload, shared by requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuGroupItemBody {
    /// Item label.
    pub label: String,
    /// Optional price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Menu section payload, shared by requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuGroupBody {
    /// Section title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Items in menu order.
    #[serde(default)]
    pub items: Vec<MenuGroupItemBody>,
    /// Whether the section is highlighted.
    #[serde(default)]
    pub pinned: bool,
}

fn menu_groups_to_domain(bodies: Vec<MenuGroupBody>) -> Result<Vec<MenuGroup>, Error> {
    bodies
        .into_iter()
        .map(|body| {
            let items = body
                .items
                .into_iter()
                .map(|item| {
                    let price = item
                        .price
                        .map(Price::new)
                        .transpose()
                        .map_err(|error| Error::invalid_request(error.to_string()))?;
                    MenuGroupItem::new(item.label, price)
                        .map_err(|error| Error::invalid_request(error.to_string()))
                })
                .collect::<Result<Vec<_>, Error>>()?;
            MenuGroup::new(body.title, body.description, items, body.pinned)
                .map_err(|error| Error::invalid_request(error.to_string()))
        })
        .collect()
}

fn menu_groups_to_body(groups: &[MenuGroup]) -> Vec<MenuGroupBody> {
    groups
        .iter()
        .map(|group| MenuGroupBody {
            title: group.title.clone(),
            description: group.description.clone(),
            items: group
                .items
                .iter()
                .map(|item| MenuGroupItemBody {
                    label: item.label.clone(),
                    price: item.price.map(|price| price.value()),
                })
                .collect(),
            pinned: group.pinned,
        })
        .collect()
}

/// Restaurant representation returned by every restaurant endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    /// Stable identifier.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Accepted payment methods.
    pub payment_types: Vec<PaymentType>,
    /// Classification tags.
    pub tags: Vec<String>,
    /// Picture URLs.
    pub pictures: Vec<String>,
    /// Menu sections.
    pub menu_groups: Vec<MenuGroupBody>,
    /// Derived mean score.
    pub average_score: f64,
    /// Derived mean of present prices.
    pub average_price: f64,
    /// Highlighted review id, if any.
    pub pinned_review: Option<ReviewId>,
    /// Review ids of this restaurant.
    pub reviews: Vec<ReviewId>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            payment_types: restaurant.payment_types.into_iter().collect(),
            tags: restaurant.tags.into_iter().collect(),
            pictures: restaurant.pictures,
            menu_groups: menu_groups_to_body(&restaurant.menu_groups),
            average_score: restaurant.average_score,
            average_price: restaurant.average_price,
            pinned_review: restaurant.pinned_review,
            reviews: restaurant.reviews,
            created_at: restaurant.created_at,
            updated_at: restaurant.updated_at,
        }
    }
}

/// Create payload. Aggregates are derived fields and unknown keys (such as
/// `averageScore`) are rejected outright.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CreateRestaurantBody {
    /// Display name.
    pub name: String,
    /// Accepted payment methods; must be non-empty.
    pub payment_types: Vec<PaymentType>,
    /// Classification tags; must be non-empty.
    pub tags: Vec<String>,
    /// Picture URLs.
    #[serde(default)]
    pub pictures: Vec<String>,
    /// Menu sections.
    #[serde(default)]
    pub menu_groups: Vec<MenuGroupBody>,
}

impl TryFrom<CreateRestaurantBody> for CreateRestaurantRequest {
    type Error = Error;

    fn try_from(body: CreateRestaurantBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: body.name,
            payment_types: body.payment_types.into_iter().collect::<BTreeSet<_>>(),
            tags: body.tags.into_iter().collect::<BTreeSet<_>>(),
            pictures: body.pictures,
            menu_groups: menu_groups_to_domain(body.menu_groups)?,
        })
    }
}

/// Update payload. Pictures and menu groups keep their stored value when
/// absent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct UpdateRestaurantBody {
    /// New display name.
    pub name: String,
    /// New payment methods; must be non-empty.
    pub payment_types: Vec<PaymentType>,
    /// New tags; must be non-empty.
    pub tags: Vec<String>,
    /// Replacement picture URLs.
    pub pictures: Option<Vec<String>>,
    /// Replacement menu sections.
    pub menu_groups: Option<Vec<MenuGroupBody>>,
}

impl TryFrom<UpdateRestaurantBody> for UpdateRestaurantRequest {
    type Error = Error;

    fn try_from(body: UpdateRestaurantBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: body.name,
            payment_types: body.payment_types.into_iter().collect::<BTreeSet<_>>(),
            tags: body.tags.into_iter().collect::<BTreeSet<_>>(),
            pictures: body.pictures,
            menu_groups: body.menu_groups.map(menu_groups_to_domain).transpose()?,
        })
    }
}

/// Create a restaurant (admin only).
#[utoipa::path(
    post,
    path = "/restaurants",
    request_body = CreateRestaurantBody,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Missing or invalid credential", body = Error),
        (status = 403, description = "Requires the admin role", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "createRestaurant"
)]
#[post("/restaurants")]
pub async fn create_restaurant(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<CreateRestaurantBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateRestaurantRequest::try_from(payload.into_inner())?;
    let restaurant = state.restaurants.create(&identity.0, request).await?;
    Ok(HttpResponse::Created().json(RestaurantResponse::from(restaurant)))
}

/// List restaurants, most recently updated first.
#[utoipa::path(
    get,
    path = "/restaurants",
    responses((status = 200, description = "Restaurants", body = [RestaurantResponse])),
    tags = ["restaurants"],
    operation_id = "listRestaurants",
    security([])
)]
#[get("/restaurants")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<RestaurantResponse>>> {
    let restaurants = state.restaurants_query.list().await?;
    Ok(web::Json(
        restaurants.into_iter().map(RestaurantResponse::from).collect(),
    ))
}

/// Fetch one restaurant.
#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant", body = RestaurantResponse),
        (status = 404, description = "Unknown restaurant", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "getRestaurant",
    security([])
)]
#[get("/restaurants/{id}")]
pub async fn get_restaurant(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    let id = RestaurantId::from_uuid(path.into_inner());
    let restaurant = state.restaurants_query.get(&id).await?;
    Ok(web::Json(RestaurantResponse::from(restaurant)))
}

/// Update a restaurant (admin only).
#[utoipa::path(
    patch,
    path = "/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant id")),
    request_body = UpdateRestaurantBody,
    responses(
        (status = 200, description = "Updated restaurant", body = RestaurantResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Requires the admin role", body = Error),
        (status = 404, description = "Unknown restaurant", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "updateRestaurant"
)]
#[patch("/restaurants/{id}")]
pub async fn update_restaurant(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateRestaurantBody>,
) -> ApiResult<web::Json<RestaurantResponse>> {
    let id = RestaurantId::from_uuid(path.into_inner());
    let request = UpdateRestaurantRequest::try_from(payload.into_inner())?;
    let restaurant = state.restaurants.update(&identity.0, &id, request).await?;
    Ok(web::Json(RestaurantResponse::from(restaurant)))
}

/// Delete a restaurant and cascade its reviews and references (admin only).
#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Restaurant deleted"),
        (status = 403, description = "Requires the admin role", body = Error),
        (status = 404, description = "Unknown restaurant", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "deleteRestaurant"
)]
#[delete("/restaurants/{id}")]
pub async fn delete_restaurant(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = RestaurantId::from_uuid(path.into_inner());
    state.restaurants.delete(&identity.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Like a restaurant. Fails with 409 when already liked.
#[utoipa::path(
    patch,
    path = "/restaurants/like/{id}",
    params(("id" = Uuid, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Like recorded"),
        (status = 404, description = "Unknown restaurant or user", body = Error),
        (status = 409, description = "Already liked", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "likeRestaurant"
)]
#[patch("/restaurants/like/{id}")]
pub async fn like_restaurant(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = RestaurantId::from_uuid(path.into_inner());
    state.restaurants.like(&identity.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Withdraw a like. Fails with 409 when the restaurant was not liked.
#[utoipa::path(
    patch,
    path = "/restaurants/dislike/{id}",
    params(("id" = Uuid, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Like withdrawn"),
        (status = 404, description = "Unknown restaurant or user", body = Error),
        (status = 409, description = "Not currently liked", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "dislikeRestaurant"
)]
#[patch("/restaurants/dislike/{id}")]
pub async fn dislike_restaurant(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = RestaurantId::from_uuid(path.into_inner());
    state.restaurants.dislike(&identity.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_deduplicates_payment_types_and_tags() {
        let body = CreateRestaurantBody {
            name: "Chez Test".to_owned(),
            payment_types: vec![PaymentType::Cash, PaymentType::Cash, PaymentType::Card],
            tags: vec!["bistro".to_owned(), "bistro".to_owned()],
            pictures: Vec::new(),
            menu_groups: Vec::new(),
        };
        let request = CreateRestaurantRequest::try_from(body).expect("convert");
        assert_eq!(request.payment_types.len(), 2);
        assert_eq!(request.tags.len(), 1);
    }

    #[test]
    fn negative_menu_prices_are_rejected() {
        let body = CreateRestaurantBody {
            name: "Chez Test".to_owned(),
            payment_types: vec![PaymentType::Cash],
            tags: vec!["bistro".to_owned()],
            pictures: Vec::new(),
            menu_groups: vec![MenuGroupBody {
                title: "Mains".to_owned(),
                description: None,
                items: vec![MenuGroupItemBody {
                    label: "Soup".to_owned(),
                    price: Some(-4.0),
                }],
                pinned: false,
            }],
        };
        let error = CreateRestaurantRequest::try_from(body).expect_err("invalid");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = json!({
            "name": "Chez Test",
            "paymentTypes": ["cash"],
            "tags": ["bistro"],
            "averageScore": 9.5
        });
        let result: Result<CreateRestaurantBody, _> = serde_json::from_value(raw);
        assert!(result.is_err(), "derived aggregate fields must not be accepted");
    }

    #[test]
    fn responses_serialize_camel_case() {
        let restaurant = Restaurant::new(
            "Chez Test",
            BTreeSet::from([PaymentType::Card]),
            BTreeSet::from(["bistro".to_owned()]),
            Vec::new(),
            Vec::new(),
        )
        .expect("valid restaurant");
        let value = serde_json::to_value(RestaurantResponse::from(restaurant)).expect("json");
        assert!(value.get("averageScore").is_some());
        assert!(value.get("paymentTypes").is_some());
        assert!(value.get("average_score").is_none());
    }
}
