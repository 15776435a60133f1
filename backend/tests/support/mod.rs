//! Shared fixtures for the integration suites: a fully wired test app over
//! the in-memory store and helpers for the common request flows.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App, Error};
use serde_json::{json, Value};
use uuid::Uuid;

use backend::bootstrap::{configure_routes, memory_state_with_hasher};
use backend::outbound::security::BcryptPasswordHasher;
use backend::Trace;

/// Signing secret shared by every test app.
pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Build the application under test over fresh in-memory collections.
///
/// Uses the minimum bcrypt cost so sign-up-heavy suites stay fast.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    let state = memory_state_with_hasher(
        TEST_SECRET,
        // bcrypt's MIN_COST (== 4) is private in this version; use its value.
        BcryptPasswordHasher::with_cost(4),
    );
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure_routes)
}

/// Service alias the helpers below operate on.
pub trait TestService:
    actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = Error>
{
}

impl<S> TestService for S where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = Error>
{
}

/// POST a JSON body, optionally with a bearer token.
pub async fn post_json(
    app: &impl TestService,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> ServiceResponse {
    let mut request = test::TestRequest::post().uri(path).set_json(body);
    if let Some(token) = token {
        request = request.insert_header(("authorization", format!("Bearer {token}")));
    }
    test::call_service(app, request.to_request()).await
}

/// PATCH a JSON body, optionally with a bearer token.
pub async fn patch_json(
    app: &impl TestService,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> ServiceResponse {
    let mut request = test::TestRequest::patch().uri(path).set_json(body);
    if let Some(token) = token {
        request = request.insert_header(("authorization", format!("Bearer {token}")));
    }
    test::call_service(app, request.to_request()).await
}

/// DELETE, optionally with a bearer token.
pub async fn delete(app: &impl TestService, path: &str, token: Option<&str>) -> ServiceResponse {
    let mut request = test::TestRequest::delete().uri(path);
    if let Some(token) = token {
        request = request.insert_header(("authorization", format!("Bearer {token}")));
    }
    test::call_service(app, request.to_request()).await
}

/// GET a JSON document from a public route.
pub async fn get_json(app: &impl TestService, path: &str) -> Value {
    let response =
        test::call_service(app, test::TestRequest::get().uri(path).to_request()).await;
    assert!(
        response.status().is_success(),
        "GET {path} failed: {}",
        response.status()
    );
    test::read_body_json(response).await
}

/// Register an account and return its id.
pub async fn sign_up(
    app: &impl TestService,
    email: &str,
    password: &str,
    roles: &[&str],
) -> Uuid {
    let response = post_json(
        app,
        "/signup",
        None,
        json!({
            "firstName": "Test",
            "lastName": "User",
            "email": email,
            "password": password,
            "roles": roles,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "sign-up should succeed");
    let body: Value = test::read_body_json(response).await;
    parse_id(&body["id"])
}

/// Sign in and return the bearer token.
pub async fn sign_in(app: &impl TestService, email: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/signin",
        None,
        json!({ "email": email, "password": password }),
    )
    .await;
    assert!(response.status().is_success(), "sign-in should succeed");
    let body: Value = test::read_body_json(response).await;
    body["accessToken"]
        .as_str()
        .expect("accessToken present")
        .to_owned()
}

/// Register an account, sign in, return `(user id, token)`.
pub async fn account_with_token(
    app: &impl TestService,
    email: &str,
    roles: &[&str],
) -> (Uuid, String) {
    let id = sign_up(app, email, "hunter2", roles).await;
    let token = sign_in(app, email, "hunter2").await;
    (id, token)
}

/// Create a restaurant as the given admin and return its id.
pub async fn create_restaurant(app: &impl TestService, admin_token: &str, name: &str) -> Uuid {
    let response = post_json(
        app,
        "/restaurants",
        Some(admin_token),
        json!({
            "name": name,
            "paymentTypes": ["card", "cash"],
            "tags": ["bistro"],
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "restaurant create should succeed");
    let body: Value = test::read_body_json(response).await;
    parse_id(&body["id"])
}

/// Create a review as the given user and return its id.
pub async fn create_review(
    app: &impl TestService,
    token: &str,
    restaurant_id: Uuid,
    score: f64,
    price: Option<f64>,
) -> Uuid {
    let mut body = json!({
        "restaurantId": restaurant_id,
        "content": "a meal happened",
        "score": score,
    });
    if let Some(price) = price {
        body["price"] = json!(price);
    }
    let response = post_json(app, "/reviews", Some(token), body).await;
    assert_eq!(response.status(), 201, "review create should succeed");
    let body: Value = test::read_body_json(response).await;
    parse_id(&body["id"])
}

/// Parse a JSON string value into a UUID.
pub fn parse_id(value: &Value) -> Uuid {
    value
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("value is a UUID string")
}
