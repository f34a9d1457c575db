// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::EmailSettings;
use crate::domain::models::submission::ContactSubmission;
use crate::domain::services::integration::{Integration, IntegrationError};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// 事务邮件请求体
#[derive(Debug, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub reply_to: String,
}

/// 通知邮件服务实现（Resend 接口）
pub struct EmailServiceImpl {
    /// HTTP 客户端
    client: reqwest::Client,
    /// API 基础URL
    api_base_url: String,
    /// API 密钥
    api_key: Option<String>,
    /// 发件人
    from: String,
    /// 收件人
    to: Option<String>,
}

impl EmailServiceImpl {
    pub fn new(client: reqwest::Client, settings: &EmailSettings) -> Self {
        Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key().map(str::to_string),
            from: settings.from.clone(),
            to: settings.recipient().map(str::to_string),
        }
    }

    /// 组装通知邮件，回复地址设为提交者邮箱
    pub fn compose(&self, submission: &ContactSubmission) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: self.to.iter().cloned().collect(),
            subject: submission.subject(),
            text: submission.summary_text(),
            reply_to: submission.email.clone(),
        }
    }
}

#[async_trait]
impl Integration for EmailServiceImpl {
    fn name(&self) -> &'static str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some() && self.to.is_some()
    }

    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), IntegrationError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let message = self.compose(submission);

        let response = self
            .client
            .post(format!("{}/emails", self.api_base_url))
            .bearer_auth(api_key)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntegrationError::from_response(response).await);
        }

        debug!(submission_id = %submission.id, "Notification email accepted by provider");
        Ok(())
    }
}
