//! End-to-end coverage of delete cascades and the like/dislike guards.

mod support;

use actix_web::test;
use serde_json::{json, Value};

use support::{
    account_with_token, create_restaurant, create_review, delete, get_json, patch_json,
    test_app,
};

#[actix_web::test]
async fn deleting_a_restaurant_scrubs_reviews_likes_and_user_references() {
    let app = test::init_service(test_app()).await;
    let (_, admin) = account_with_token(&app, "admin@example.com", &["admin"]).await;
    let restaurant_id = create_restaurant(&app, &admin, "Doomed").await;
    let survivor_id = create_restaurant(&app, &admin, "Survivor").await;

    let (u1_id, u1) = account_with_token(&app, "u1@example.com", &[]).await;
    let (u2_id, u2) = account_with_token(&app, "u2@example.com", &[]).await;

    let r1 = create_review(&app, &u1, restaurant_id, 8.0, None).await;
    let r2 = create_review(&app, &u2, restaurant_id, 6.0, None).await;
    let kept = create_review(&app, &u1, survivor_id, 9.0, None).await;

    let like = patch_json(
        &app,
        &format!("/restaurants/like/{restaurant_id}"),
        Some(&u1),
        json!({}),
    )
    .await;
    assert_eq!(like.status(), 204);

    let response = delete(&app, &format!("/restaurants/{restaurant_id}"), Some(&admin)).await;
    assert_eq!(response.status(), 204);

    // The reviews are gone with their restaurant.
    for review in [r1, r2] {
        let lookup = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/reviews/{review}"))
                .to_request(),
        )
        .await;
        assert_eq!(lookup.status(), 404);
    }

    // Both users lost the dangling review ids; u1 also lost the like.
    let u1_doc = get_json(&app, &format!("/users/{u1_id}")).await;
    assert_eq!(u1_doc["likes"], json!([]));
    let u1_reviews: Vec<Value> = u1_doc["reviews"]
        .as_array()
        .expect("reviews array")
        .clone();
    assert_eq!(u1_reviews.len(), 1);
    assert_eq!(u1_reviews[0]["id"], json!(kept));

    let u2_doc = get_json(&app, &format!("/users/{u2_id}")).await;
    assert_eq!(u2_doc["reviews"], json!([]));

    // The other restaurant is untouched.
    let survivor = get_json(&app, &format!("/restaurants/{survivor_id}")).await;
    assert_eq!(survivor["reviews"], json!([kept]));
}

#[actix_web::test]
async fn deleting_a_user_scrubs_their_reviews_and_recomputes_aggregates() {
    let app = test::init_service(test_app()).await;
    let (_, admin) = account_with_token(&app, "admin@example.com", &["admin"]).await;
    let restaurant_id = create_restaurant(&app, &admin, "Chez Test").await;

    let (doomed_id, doomed) = account_with_token(&app, "doomed@example.com", &[]).await;
    let (_, bob) = account_with_token(&app, "bob@example.com", &[]).await;

    create_review(&app, &doomed, restaurant_id, 2.0, Some(5.0)).await;
    create_review(&app, &bob, restaurant_id, 8.0, Some(25.0)).await;

    let before = get_json(&app, &format!("/restaurants/{restaurant_id}")).await;
    assert_eq!(before["averageScore"], json!(5.0));
    assert_eq!(before["averagePrice"], json!(15.0));

    let response = delete(&app, &format!("/users/{doomed_id}"), Some(&doomed)).await;
    assert_eq!(response.status(), 204);

    let lookup = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/{doomed_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(lookup.status(), 404);

    // Only Bob's review remains and the aggregates reflect that.
    let after = get_json(&app, &format!("/restaurants/{restaurant_id}")).await;
    assert_eq!(after["reviews"].as_array().map(Vec::len), Some(1));
    assert_eq!(after["averageScore"], json!(8.0));
    assert_eq!(after["averagePrice"], json!(25.0));
}

#[actix_web::test]
async fn likes_guard_against_double_like_and_unliked_dislike() {
    let app = test::init_service(test_app()).await;
    let (_, admin) = account_with_token(&app, "admin@example.com", &["admin"]).await;
    let restaurant_id = create_restaurant(&app, &admin, "Chez Test").await;
    let (user_id, user) = account_with_token(&app, "alice@example.com", &[]).await;

    let premature = patch_json(
        &app,
        &format!("/restaurants/dislike/{restaurant_id}"),
        Some(&user),
        json!({}),
    )
    .await;
    assert_eq!(premature.status(), 409);

    let first = patch_json(
        &app,
        &format!("/restaurants/like/{restaurant_id}"),
        Some(&user),
        json!({}),
    )
    .await;
    assert_eq!(first.status(), 204);

    let second = patch_json(
        &app,
        &format!("/restaurants/like/{restaurant_id}"),
        Some(&user),
        json!({}),
    )
    .await;
    assert_eq!(second.status(), 409);

    let user_doc = get_json(&app, &format!("/users/{user_id}")).await;
    assert_eq!(user_doc["likes"].as_array().map(Vec::len), Some(1));
    assert_eq!(user_doc["likes"][0]["id"], json!(restaurant_id));

    let undo = patch_json(
        &app,
        &format!("/restaurants/dislike/{restaurant_id}"),
        Some(&user),
        json!({}),
    )
    .await;
    assert_eq!(undo.status(), 204);

    let after = get_json(&app, &format!("/users/{user_id}")).await;
    assert_eq!(after["likes"], json!([]));
}

#[actix_web::test]
async fn liking_an_unknown_restaurant_is_not_found() {
    let app = test::init_service(test_app()).await;
    let (_, user) = account_with_token(&app, "alice@example.com", &[]).await;

    let response = patch_json(
        &app,
        &format!("/restaurants/like/{}", uuid::Uuid::new_v4()),
        Some(&user),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), 404);
}
