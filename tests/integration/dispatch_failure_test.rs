// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    ada, attribution_path, create_test_app, create_test_app_with, mount_attribution,
    mount_crm_create, mount_crm_note, mount_email, mount_happy_integrations, mount_webhook,
    requests_to, total_requests, CONTACTS_PATH, EMAIL_PATH, NOTES_PATH, WEBHOOK_A_PATH,
    WEBHOOK_B_PATH,
};
use axum::http::StatusCode;
use leadrelay::application::dto::contact_response::ACCEPTED_MESSAGE;
use serde_json::Value;

#[tokio::test]
async fn test_email_failure_does_not_block_other_integrations() {
    let app = create_test_app().await;
    // Given: 邮件服务返回 500，其余集成正常
    mount_email(&app.providers, 500).await;
    mount_attribution(&app.providers, 200).await;
    mount_crm_create(&app.providers, 201, "501").await;
    mount_crm_note(&app.providers, 201).await;
    mount_webhook(&app.providers, WEBHOOK_A_PATH, 200).await;
    mount_webhook(&app.providers, WEBHOOK_B_PATH, 200).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    // Then: 调用方仍然收到成功
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], ACCEPTED_MESSAGE);

    assert_eq!(requests_to(&app.providers, "POST", EMAIL_PATH).await.len(), 1);
    assert_eq!(requests_to(&app.providers, "POST", &attribution_path()).await.len(), 1);
    assert_eq!(requests_to(&app.providers, "POST", CONTACTS_PATH).await.len(), 1);
    assert_eq!(requests_to(&app.providers, "POST", NOTES_PATH).await.len(), 1);
    assert_eq!(requests_to(&app.providers, "POST", WEBHOOK_A_PATH).await.len(), 1);
    assert_eq!(requests_to(&app.providers, "POST", WEBHOOK_B_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_crm_failure_skips_note_but_succeeds() {
    let app = create_test_app().await;
    mount_email(&app.providers, 200).await;
    mount_attribution(&app.providers, 200).await;
    mount_crm_create(&app.providers, 500, "").await;
    mount_crm_note(&app.providers, 201).await;
    mount_webhook(&app.providers, WEBHOOK_A_PATH, 200).await;
    mount_webhook(&app.providers, WEBHOOK_B_PATH, 200).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(requests_to(&app.providers, "POST", NOTES_PATH).await.is_empty());
    assert_eq!(requests_to(&app.providers, "POST", EMAIL_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_attribution_failure_is_absorbed() {
    let app = create_test_app().await;
    mount_email(&app.providers, 200).await;
    mount_attribution(&app.providers, 400).await;
    mount_crm_create(&app.providers, 201, "501").await;
    mount_crm_note(&app.providers, 201).await;
    mount_webhook(&app.providers, WEBHOOK_A_PATH, 200).await;
    mount_webhook(&app.providers, WEBHOOK_B_PATH, 200).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(requests_to(&app.providers, "POST", NOTES_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_unreachable_provider_is_absorbed() {
    // 邮件服务指向一个无人监听的端口
    let app = create_test_app_with(&[("LEADRELAY__EMAIL__API_BASE_URL", "http://127.0.0.1:9")])
        .await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(requests_to(&app.providers, "POST", CONTACTS_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_unconfigured_integrations_are_silent_noops() {
    let app = create_test_app_with(&[
        ("LEADRELAY__EMAIL__API_KEY", ""),
        ("LEADRELAY__ATTRIBUTION__PORTAL_ID", ""),
        ("LEADRELAY__CRM__ACCESS_TOKEN", ""),
        ("LEADRELAY__WEBHOOKS__URLS", ""),
    ])
    .await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(total_requests(&app.providers).await, 0);
}
