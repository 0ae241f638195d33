// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Zone creation and details, plus zone and user profile edits through the
//! router.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use trailhead_api::db::AdventureStore;
use trailhead_api::models::{User, Zone};

mod common;
use common::{body_json, create_test_app, json_request};

fn new_zone_body() -> serde_json::Value {
    json!({
        "zone": {
            "adventure_type": "ski",
            "zone_name": "Teton Pass",
            "coordinates": { "lat": 43.49, "lng": -110.95 },
            "public": true,
            "nearest_city": "Wilson",
            "bio": "Roadside laps"
        }
    })
}

#[tokio::test]
async fn test_create_zone_then_details() {
    let (app, _, store) = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/zones", 8, new_zone_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 201);
    let zone_id = body["data"]["zone"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["zone"]["creator_id"], 8);

    let stored = store.get_zone(&zone_id).await.unwrap().unwrap();
    assert_eq!(stored.zone_name, "Teton Pass");
    assert_eq!(stored.coordinates_lng, -110.95);
    assert!(stored.public);

    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/zones/details?zone_id={zone_id}"),
            8,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["zone"]["nearest_city"], "Wilson");
}

#[tokio::test]
async fn test_create_zone_rejects_unknown_adventure_type() {
    let (app, _, _) = create_test_app();
    let mut body = new_zone_body();
    body["zone"]["adventure_type"] = json!("kayak");

    let response = app
        .oneshot(json_request("POST", "/zones", 8, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body_json(response).await["error"]["code"], "invalid_field_shape");
}

#[tokio::test]
async fn test_create_zone_requires_coordinates() {
    let (app, _, _) = create_test_app();
    let mut body = new_zone_body();
    body["zone"]["coordinates"] = json!({ "lat": 43.49 });

    let response = app
        .oneshot(json_request("POST", "/zones", 8, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "invalid_field_shape");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("coordinates"));
}

#[tokio::test]
async fn test_zone_details_not_found_and_missing_id() {
    let (app, _, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request("GET", "/zones/details?zone_id=nope", 8, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(json_request("GET", "/zones/details", 8, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "missing_required_fields"
    );
}

#[tokio::test]
async fn test_zone_public_coerced() {
    let (app, _, store) = create_test_app();
    store.put_zone(&Zone::new("z1", "ski")).await.unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/zones",
            8,
            json!({ "field": { "field_name": "public", "field_value": "1", "zone_id": "z1" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.get_zone("z1").await.unwrap().unwrap().public);
}

#[tokio::test]
async fn test_zone_coordinates() {
    let (app, _, store) = create_test_app();
    store.put_zone(&Zone::new("z2", "climb")).await.unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/zones",
            8,
            json!({
                "field": {
                    "field_name": "coordinates",
                    "field_value": { "lat": 43.74, "lng": -110.8 },
                    "zone_id": "z2"
                }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let zone = store.get_zone("z2").await.unwrap().unwrap();
    assert_eq!(zone.coordinates_lat, 43.74);
    assert_eq!(zone.coordinates_lng, -110.8);
}

#[tokio::test]
async fn test_zone_rating_is_immutable() {
    let (app, _, store) = create_test_app();
    store.put_zone(&Zone::new("z3", "hike")).await.unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/zones",
            8,
            json!({ "field": { "field_name": "rating", "field_value": "5:1", "zone_id": "z3" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body_json(response).await["error"]["code"], "immutable_field");
}

#[tokio::test]
async fn test_zone_not_found() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/zones",
            8,
            json!({ "field": { "field_name": "bio", "field_value": "x", "zone_id": "nope" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_name_stripped() {
    let (app, _, store) = create_test_app();
    store.put_user(&User::new(21, "jo@example.com")).await.unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/users",
            21,
            json!({ "field": { "name": "first_name", "value": "Jo hn3!" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["value"], "John");
    assert_eq!(body["data"]["user_id"], 21);

    assert_eq!(store.get_user(21).await.unwrap().unwrap().first_name, "John");
}

#[tokio::test]
async fn test_user_edit_targets_caller_only() {
    let (app, _, store) = create_test_app();
    store.put_user(&User::new(21, "a@example.com")).await.unwrap();
    store.put_user(&User::new(22, "b@example.com")).await.unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/users",
            22,
            json!({ "field": { "name": "city", "value": "Wilson" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(store.get_user(21).await.unwrap().unwrap().city, "");
    assert_eq!(store.get_user(22).await.unwrap().unwrap().city, "Wilson");
}

#[tokio::test]
async fn test_user_unknown_and_immutable_fields() {
    let (app, _, store) = create_test_app();
    store.put_user(&User::new(23, "c@example.com")).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/users",
            23,
            json!({ "field": { "name": "shoe_size", "value": "44" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body_json(response).await["error"]["code"], "unknown_field");

    let response = app
        .oneshot(json_request(
            "PUT",
            "/users",
            23,
            json!({ "field": { "name": "email", "value": "new@example.com" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body_json(response).await["error"]["code"], "immutable_field");
}
