// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{ada, create_test_app, mount_happy_integrations, total_requests};
use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_each_missing_required_field_is_named() {
    for field in [
        "firstName",
        "lastName",
        "companyName",
        "email",
        "website",
        "message",
    ] {
        let app = create_test_app().await;
        mount_happy_integrations(&app.providers).await;

        // Given: 缺少一个必填字段
        let mut payload = ada();
        payload.as_object_mut().unwrap().remove(field);

        // When: POST /api/contact
        let response = app.server.post("/api/contact").json(&payload).await;

        // Then: 400，且错误信息中包含该字段
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "field {field}");
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(
            body["message"].as_str().unwrap().contains(field),
            "message should name {field}: {body}"
        );
        assert!(body["details"].get(field).is_some(), "details should key {field}");

        // 校验失败时不触发任何下游调用
        assert_eq!(total_requests(&app.providers).await, 0);
    }
}

#[tokio::test]
async fn test_empty_string_counts_as_missing() {
    let app = create_test_app().await;
    let mut payload = ada();
    payload["companyName"] = Value::String(String::new());

    let response = app.server.post("/api/contact").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("companyName"));
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    for email in ["not-an-email", "ada@", "@example.com"] {
        let app = create_test_app().await;
        let mut payload = ada();
        payload["email"] = Value::String(email.to_string());

        let response = app.server.post("/api/contact").json(&payload).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "email {email}");
        let body: Value = response.json();
        assert!(body["details"]["email"].is_array());
        assert_eq!(total_requests(&app.providers).await, 0);
    }
}

#[tokio::test]
async fn test_every_violation_is_reported() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/contact")
        .json(&serde_json::json!({ "email": "broken" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let details = body["details"].as_object().unwrap();
    assert_eq!(details.len(), 6);
    assert!(!details.contains_key("phone"));
}

#[tokio::test]
async fn test_non_json_body_is_bad_request() {
    let app = create_test_app().await;

    let response = app.server.post("/api/contact").text("firstName=Ada").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_phone_is_optional() {
    let app = create_test_app().await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
