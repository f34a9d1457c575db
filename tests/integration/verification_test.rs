// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    ada, assessment_path, create_test_app_with, dispatch_requests, mount_assessment,
    mount_happy_integrations, recaptcha_env, requests_to, EMAIL_PATH, RECAPTCHA_API_KEY, SITE_KEY,
};
use axum::http::StatusCode;
use leadrelay::domain::services::risk_verifier::GENERIC_VERIFICATION_MESSAGE;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn with_token(token: &str) -> Value {
    let mut payload = ada();
    payload["recaptchaToken"] = Value::String(token.to_string());
    payload
}

#[tokio::test]
async fn test_missing_token_rejected_without_provider_call() {
    let app = create_test_app_with(&recaptcha_env()).await;
    mount_assessment(&app.providers, true, 0.9, "contact_form").await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], GENERIC_VERIFICATION_MESSAGE);
    assert!(body.get("reason").is_none());

    assert!(requests_to(&app.providers, "POST", &assessment_path()).await.is_empty());
    assert_eq!(dispatch_requests(&app.providers).await, 0);
}

#[tokio::test]
async fn test_low_score_blocks_all_dispatch() {
    let app = create_test_app_with(&recaptcha_env()).await;
    mount_assessment(&app.providers, true, 0.1, "contact_form").await;
    mount_happy_integrations(&app.providers).await;

    let response = app
        .server
        .post("/api/contact")
        .json(&with_token("low-score-token"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], GENERIC_VERIFICATION_MESSAGE);

    assert_eq!(requests_to(&app.providers, "POST", &assessment_path()).await.len(), 1);
    // 邮件、归因、CRM、Webhook 均未被调用
    assert_eq!(dispatch_requests(&app.providers).await, 0);
}

#[tokio::test]
async fn test_passing_assessment_dispatches() {
    let app = create_test_app_with(&recaptcha_env()).await;
    mount_assessment(&app.providers, true, 0.9, "contact_form").await;
    mount_happy_integrations(&app.providers).await;

    let response = app
        .server
        .post("/api/contact")
        .add_header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .add_header("user-agent", "Mozilla/5.0 (Test)")
        .json(&with_token("good-token"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let assessments = requests_to(&app.providers, "POST", &assessment_path()).await;
    assert_eq!(assessments.len(), 1);

    // 凭据以内存方式注入，作为 key 查询参数发送
    let query: Vec<(String, String)> = assessments[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(query.contains(&("key".to_string(), RECAPTCHA_API_KEY.to_string())));

    let sent: Value = assessments[0].body_json().unwrap();
    assert_eq!(sent["event"]["token"], "good-token");
    assert_eq!(sent["event"]["siteKey"], SITE_KEY);
    assert_eq!(sent["event"]["expectedAction"], "contact_form");
    assert_eq!(sent["event"]["userIpAddress"], "203.0.113.9");
    assert_eq!(sent["event"]["userAgent"], "Mozilla/5.0 (Test)");

    assert_eq!(requests_to(&app.providers, "POST", EMAIL_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_score_at_threshold_passes() {
    let app = create_test_app_with(&recaptcha_env()).await;
    mount_assessment(&app.providers, true, 0.5, "contact_form").await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&with_token("t")).await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_action_mismatch_is_rejected() {
    let app = create_test_app_with(&recaptcha_env()).await;
    mount_assessment(&app.providers, true, 0.9, "login").await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&with_token("t")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(dispatch_requests(&app.providers).await, 0);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = create_test_app_with(&recaptcha_env()).await;
    mount_assessment(&app.providers, false, 0.0, "").await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&with_token("t")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(dispatch_requests(&app.providers).await, 0);
}

#[tokio::test]
async fn test_provider_error_is_generic_to_caller() {
    let app = create_test_app_with(&recaptcha_env()).await;
    Mock::given(method("POST"))
        .and(path(assessment_path()))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&app.providers)
        .await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&with_token("t")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], GENERIC_VERIFICATION_MESSAGE);
    assert!(!body.to_string().contains("API key not valid"));
    assert_eq!(dispatch_requests(&app.providers).await, 0);
}

#[tokio::test]
async fn test_debug_flag_exposes_reason() {
    let mut vars = recaptcha_env();
    vars.push(("LEADRELAY__RECAPTCHA__EXPOSE_VERIFICATION_ERRORS", "true"));
    let app = create_test_app_with(&vars).await;
    mount_assessment(&app.providers, true, 0.2, "contact_form").await;

    let response = app.server.post("/api/contact").json(&with_token("t")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["reason"].as_str().unwrap().contains("below threshold"));
}

#[tokio::test]
async fn test_bypass_skips_verification() {
    let mut vars = recaptcha_env();
    vars.push(("LEADRELAY__RECAPTCHA__BYPASS", "true"));
    let app = create_test_app_with(&vars).await;
    mount_assessment(&app.providers, true, 0.0, "contact_form").await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(requests_to(&app.providers, "POST", &assessment_path()).await.is_empty());
    assert_eq!(requests_to(&app.providers, "POST", EMAIL_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_unconfigured_provider_needs_no_token() {
    let app = create_test_app_with(&[]).await;
    mount_happy_integrations(&app.providers).await;

    let response = app.server.post("/api/contact").json(&ada()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(requests_to(&app.providers, "POST", &assessment_path()).await.is_empty());
}
