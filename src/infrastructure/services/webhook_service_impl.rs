// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::WebhookSettings;
use crate::domain::models::submission::ContactSubmission;
use crate::domain::services::integration::{Integration, IntegrationError};
use async_trait::async_trait;
use futures::future::join_all;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{error, info};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Leadrelay-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Leadrelay-Timestamp";
pub const SUBMISSION_ID_HEADER: &str = "X-Leadrelay-Submission-ID";

/// 为负载生成签名
///
/// 签名内容为 `"{timestamp}.{payload}"`，算法 HMAC-SHA256，十六进制编码
pub fn generate_signature(secret: &str, payload: &str, timestamp: i64) -> String {
    let message = format!("{}.{}", timestamp, payload);
    // HMAC accepts keys of any length, so this never fails
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Webhook服务实现
///
/// 将同一份标准化负载逐个发送到所有配置的地址，
/// 每个地址独立发送，失败只记录日志
pub struct WebhookServiceImpl {
    /// HTTP 客户端
    client: reqwest::Client,
    /// 目标地址
    urls: Vec<String>,
    /// 签名密钥
    secret: Option<String>,
}

impl WebhookServiceImpl {
    pub fn new(client: reqwest::Client, settings: &WebhookSettings) -> Self {
        Self {
            client,
            urls: settings.targets(),
            secret: settings.secret().map(str::to_string),
        }
    }

    async fn send_to(
        &self,
        url: &str,
        body: &str,
        submission: &ContactSubmission,
    ) -> Result<(), IntegrationError> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header(SUBMISSION_ID_HEADER, submission.id.to_string());

        if let Some(secret) = &self.secret {
            let timestamp = chrono::Utc::now().timestamp();
            request = request
                .header(SIGNATURE_HEADER, generate_signature(secret, body, timestamp))
                .header(TIMESTAMP_HEADER, timestamp.to_string());
        }

        let response = request.body(body.to_string()).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(IntegrationError::from_response(response).await)
        }
    }
}

#[async_trait]
impl Integration for WebhookServiceImpl {
    fn name(&self) -> &'static str {
        "webhooks"
    }

    fn is_enabled(&self) -> bool {
        !self.urls.is_empty()
    }

    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), IntegrationError> {
        let body = serde_json::to_string(&submission.webhook_payload())?;

        let results = join_all(self.urls.iter().map(|url| {
            let body = body.as_str();
            async move { (url, self.send_to(url, body, submission).await) }
        }))
        .await;

        let mut failed = 0;
        for (url, result) in &results {
            match result {
                Ok(()) => info!(submission_id = %submission.id, url = %url, "Webhook delivered"),
                Err(e) => {
                    failed += 1;
                    error!(
                        submission_id = %submission.id,
                        url = %url,
                        error = %e,
                        "Webhook delivery failed"
                    );
                }
            }
        }

        if failed > 0 {
            return Err(IntegrationError::PartialDelivery {
                failed,
                attempted: results.len(),
            });
        }
        Ok(())
    }
}
