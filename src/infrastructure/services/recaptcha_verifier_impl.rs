// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{RecaptchaCredential, RecaptchaSettings};
use crate::domain::models::assessment::{AssessmentRequest, RiskAssessment};
use crate::domain::services::risk_verifier::{RiskVerifier, VerificationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentEvent<'a> {
    token: &'a str,
    site_key: &'a str,
    expected_action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_ip_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreateAssessmentRequest<'a> {
    event: AssessmentEvent<'a>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenProperties {
    #[serde(default)]
    valid: bool,
    invalid_reason: Option<String>,
    hostname: Option<String>,
    #[serde(default)]
    action: String,
}

#[derive(Debug, Default, Deserialize)]
struct RiskAnalysis {
    #[serde(default)]
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentResponse {
    #[serde(default)]
    token_properties: TokenProperties,
    #[serde(default)]
    risk_analysis: RiskAnalysis,
}

/// reCAPTCHA Enterprise 验证实现
///
/// 凭据在启动时以内存方式注入，不写临时文件，也不修改进程环境变量
pub struct RecaptchaVerifierImpl {
    client: reqwest::Client,
    api_base_url: String,
    project_id: String,
    site_key: String,
    credential: RecaptchaCredential,
}

impl RecaptchaVerifierImpl {
    pub fn new(
        client: reqwest::Client,
        api_base_url: impl Into<String>,
        project_id: impl Into<String>,
        site_key: impl Into<String>,
        credential: RecaptchaCredential,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            site_key: site_key.into(),
            credential,
        }
    }

    /// 配置完整且未跳过时创建验证器
    pub fn from_settings(client: reqwest::Client, settings: &RecaptchaSettings) -> Option<Self> {
        if !settings.is_enabled() {
            return None;
        }
        Some(Self::new(
            client,
            settings.api_base_url.clone(),
            settings.project_id()?,
            settings.site_key()?,
            settings.credential()?,
        ))
    }
}

#[async_trait]
impl RiskVerifier for RecaptchaVerifierImpl {
    async fn assess(&self, request: &AssessmentRequest) -> Result<RiskAssessment, VerificationError> {
        let url = format!(
            "{}/v1/projects/{}/assessments",
            self.api_base_url,
            urlencoding::encode(&self.project_id)
        );

        let body = CreateAssessmentRequest {
            event: AssessmentEvent {
                token: &request.token,
                site_key: &self.site_key,
                expected_action: &request.expected_action,
                user_ip_address: request.user_ip.as_deref(),
                user_agent: request.user_agent.as_deref(),
            },
        };

        let builder = self.client.post(url).json(&body);
        let builder = match &self.credential {
            RecaptchaCredential::ApiKey(key) => builder.query(&[("key", key.as_str())]),
            RecaptchaCredential::AccessToken(token) => builder.bearer_auth(token),
        };

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VerificationError::Provider(format!(
                "assessment request returned {}: {}",
                status, text
            )));
        }

        let parsed: AssessmentResponse = response
            .json()
            .await
            .map_err(|e| VerificationError::Provider(format!("malformed assessment: {}", e)))?;

        Ok(RiskAssessment {
            valid: parsed.token_properties.valid,
            score: parsed.risk_analysis.score,
            action: parsed.token_properties.action,
            hostname: parsed.token_properties.hostname,
            invalid_reason: parsed.token_properties.invalid_reason,
        })
    }
}
