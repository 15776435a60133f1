//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST surface.
//! Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Error, ErrorCode, PaymentType, RestaurantId, ReviewId, Role, UserId,
};
use crate::inbound::http::health::Greeting;
use crate::inbound::http::restaurants::{
    CreateRestaurantBody, MenuGroupBody, MenuGroupItemBody, RestaurantResponse,
    UpdateRestaurantBody,
};
use crate::inbound::http::reviews::{
    CreateReviewBody, PinTargetBody, ReviewResponse, UpdateReviewBody,
};
use crate::inbound::http::users::{
    SignInBody, SignInResponse, SignUpBody, UpdateUserBody, UserProfileResponse, UserResponse,
};

/// Enrich the generated document with the bearer credential scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Restaurant reviews backend API",
        description = "Users, restaurants and reviews with bearer-credential \
                       authentication and derived restaurant aggregates."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::health::index,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::sign_up,
        crate::inbound::http::users::sign_in,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::restaurants::create_restaurant,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::restaurants::get_restaurant,
        crate::inbound::http::restaurants::update_restaurant,
        crate::inbound::http::restaurants::delete_restaurant,
        crate::inbound::http::restaurants::like_restaurant,
        crate::inbound::http::restaurants::dislike_restaurant,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::get_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::reviews::pin_review,
        crate::inbound::http::reviews::unpin_review,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Greeting,
        UserId,
        RestaurantId,
        ReviewId,
        Role,
        PaymentType,
        UserResponse,
        UserProfileResponse,
        SignUpBody,
        SignInBody,
        SignInResponse,
        UpdateUserBody,
        RestaurantResponse,
        CreateRestaurantBody,
        UpdateRestaurantBody,
        MenuGroupBody,
        MenuGroupItemBody,
        ReviewResponse,
        CreateReviewBody,
        UpdateReviewBody,
        PinTargetBody,
    )),
    tags(
        (name = "meta", description = "Service banner"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "users", description = "Accounts, sign-up and sign-in"),
        (name = "restaurants", description = "Restaurant catalogue and likes"),
        (name = "reviews", description = "Reviews, pins and aggregates")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/signup",
            "/signin",
            "/users",
            "/users/{id}",
            "/restaurants",
            "/restaurants/{id}",
            "/restaurants/like/{id}",
            "/restaurants/dislike/{id}",
            "/reviews",
            "/reviews/{id}",
            "/reviews/pin/{id}",
            "/reviews/unpin",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in OpenAPI document"
            );
        }
    }

    #[test]
    fn error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("Error"));
        assert!(components.schemas.contains_key("RestaurantResponse"));
    }
}
