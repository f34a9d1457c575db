// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::submission::ContactSubmission;
use async_trait::async_trait;
use thiserror::Error;

/// 集成错误类型
///
/// 仅用于日志和指标，不会返回给提交者
#[derive(Error, Debug)]
pub enum IntegrationError {
    /// 网络请求失败
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// 非预期的响应状态
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// 响应内容无法解析
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// 负载序列化失败
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 部分 Webhook 投递失败
    #[error("{failed} of {attempted} webhook deliveries failed")]
    PartialDelivery { failed: usize, attempted: usize },
}

impl IntegrationError {
    /// 从非成功响应构造错误
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        IntegrationError::UnexpectedStatus { status, body }
    }
}

/// 外部集成特质
///
/// 邮件、归因、CRM、Webhook 四类副作用都实现此接口，
/// 由分发服务统一调度
#[async_trait]
pub trait Integration: Send + Sync {
    /// 日志与指标中使用的名称
    fn name(&self) -> &'static str;

    /// 配置是否完整
    fn is_enabled(&self) -> bool;

    /// 执行一次投递，不重试
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), IntegrationError>;
}
