//! Integration tests for venue submission and reads.

mod common;

use axum::http::StatusCode;
use common::{body_json, main_hall, MultipartForm, TestApp, TEST_MAX_FILE_BYTES};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn main_hall_without_media_is_created() {
    let app = TestApp::new();
    let token = app.organizer_token().await;

    let response = app
        .post_multipart(
            "/api/v1/venues",
            Some(&token),
            MultipartForm::new().payload(&main_hall()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["entity"]["name"], "Main Hall");
    assert_eq!(data["entity"]["zip_code"], "62704");
    assert_eq!(data["entity"]["capacity"], 100);
    assert_eq!(data["entity"]["is_active"], true);
    assert_eq!(data["state"], "done");
    assert_eq!(data["uploaded_urls"], json!([]));
    assert_eq!(data["failed_uploads"], json!([]));

    let id = data["entity"]["id"].as_str().unwrap();
    let media = body_json(app.get(&format!("/api/v1/venues/{id}/media")).await).await;
    assert_eq!(media["data"], json!([]));
}

#[tokio::test]
async fn staged_media_is_uploaded_and_recorded() {
    let app = TestApp::new();
    let token = app.organizer_token().await;

    let form = MultipartForm::new()
        .payload(&main_hall())
        .media("front.png", "image/png", b"png-bytes")
        .media("tour.mp4", "video/mp4", b"mp4-bytes");
    let response = app.post_multipart("/api/v1/venues", Some(&token), form).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    let uploaded = data["uploaded_urls"].as_array().unwrap();
    assert_eq!(uploaded.len(), 2);
    assert_eq!(data["entity"]["media_urls"], data["uploaded_urls"]);
    assert!(uploaded[0].as_str().unwrap().ends_with(".png"));
    assert!(uploaded[1].as_str().unwrap().ends_with(".mp4"));
    assert_eq!(app.objects.len().await, 2);

    let id = data["entity"]["id"].as_str().unwrap();
    let media = body_json(app.get(&format!("/api/v1/venues/{id}/media")).await).await;
    assert_eq!(media["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn oversized_file_is_reported_and_not_uploaded() {
    let app = TestApp::new();
    let token = app.organizer_token().await;
    let too_big = vec![0u8; TEST_MAX_FILE_BYTES as usize + 1];

    let form = MultipartForm::new()
        .payload(&main_hall())
        .media("huge.jpg", "image/jpeg", &too_big);
    let response = app.post_multipart("/api/v1/venues", Some(&token), form).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let rejected = json["data"]["rejected_files"].as_array().unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["name"], "huge.jpg");
    assert_eq!(json["data"]["uploaded_urls"], json!([]));
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn short_name_is_rejected_with_field_details() {
    let app = TestApp::new();
    let token = app.organizer_token().await;

    let response = app
        .post_multipart(
            "/api/v1/venues",
            Some(&token),
            MultipartForm::new()
                .payload(&json!({ "name": "A" }))
                .media("front.png", "image/png", b"png-bytes"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(app.objects.is_empty().await);

    let venues = body_json(app.get("/api/v1/venues").await).await;
    assert_eq!(venues["data"], json!([]));
}

#[tokio::test]
async fn missing_payload_is_bad_request() {
    let app = TestApp::new();
    let token = app.organizer_token().await;

    let response = app
        .post_multipart(
            "/api/v1/venues",
            Some(&token),
            MultipartForm::new().media("front.png", "image/png", b"png-bytes"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn submission_requires_token_and_role() {
    let app = TestApp::new();

    let anonymous = app
        .post_multipart(
            "/api/v1/venues",
            None,
            MultipartForm::new().payload(&main_hall()),
        )
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let attendee = app.attendee_token();
    let forbidden = app
        .post_multipart(
            "/api/v1/venues",
            Some(&attendee),
            MultipartForm::new().payload(&main_hall()),
        )
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(forbidden).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn venues_are_listed_by_name() {
    let app = TestApp::new();
    let token = app.organizer_token().await;

    for name in ["Warehouse", "Attic", "Main Hall"] {
        let mut payload = main_hall();
        payload["name"] = json!(name);
        let response = app
            .post_multipart(
                "/api/v1/venues",
                Some(&token),
                MultipartForm::new().payload(&payload),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let first = body_json(app.get("/api/v1/venues").await).await;
    let second = body_json(app.get("/api/v1/venues").await).await;
    assert_eq!(first, second);

    let names: Vec<&str> = first["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Attic", "Main Hall", "Warehouse"]);
}

#[tokio::test]
async fn unknown_venue_is_404() {
    let app = TestApp::new();
    let id = Uuid::new_v4();

    let response = app.get(&format!("/api/v1/venues/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let media = app.get(&format!("/api/v1/venues/{id}/media")).await;
    assert_eq!(media.status(), StatusCode::NOT_FOUND);
}
