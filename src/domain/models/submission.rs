// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use uuid::Uuid;

/// Webhook 负载中的事件名称
pub const SUBMISSION_EVENT: &str = "contact.submitted";

/// 联系表单提交实体
///
/// 通过校验后的表单数据。生命周期仅限于一次请求，
/// 分发到各外部集成后即被丢弃。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    /// 提交唯一标识符，用于日志关联
    pub id: Uuid,
    /// 名
    pub first_name: String,
    /// 姓
    pub last_name: String,
    /// 公司名称
    pub company_name: String,
    /// 联系邮箱
    pub email: String,
    /// 电话（可选）
    pub phone: Option<String>,
    /// 公司网站
    pub website: String,
    /// 留言内容
    pub message: String,
    /// 提交时间
    pub submitted_at: DateTime<Utc>,
    /// 调用方信息
    #[serde(skip)]
    pub context: ClientContext,
}

/// 调用方请求上下文
///
/// 从请求头中提取，供人机验证与归因上报使用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    /// 客户端IP
    pub ip: Option<String>,
    /// 客户端 User-Agent
    pub user_agent: Option<String>,
    /// 提交表单的页面地址（Referer）
    pub page_uri: Option<String>,
    /// 归因追踪 Cookie（hubspotutk）
    pub tracking_cookie: Option<String>,
}

impl ContactSubmission {
    /// 提交者全名
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 通知邮件主题
    pub fn subject(&self) -> String {
        format!(
            "New contact form submission from {} ({})",
            self.full_name(),
            self.company_name
        )
    }

    /// 生成纯文本摘要，用于通知邮件正文
    pub fn summary_text(&self) -> String {
        format!(
            "New contact form submission\n\n\
             Name: {}\n\
             Company: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Website: {}\n\n\
             Message:\n{}\n\n\
             Submission ID: {}\n\
             Submitted at: {}\n",
            self.full_name(),
            self.company_name,
            self.email,
            self.phone.as_deref().unwrap_or("Not provided"),
            self.website,
            self.message,
            self.id,
            self.submitted_at.to_rfc3339(),
        )
    }

    /// 转发到自动化 Webhook 的标准化负载
    pub fn webhook_payload(&self) -> Value {
        json!({
            "event": SUBMISSION_EVENT,
            "submissionId": self.id,
            "submittedAt": self.submitted_at.to_rfc3339(),
            "firstName": self.first_name,
            "lastName": self.last_name,
            "companyName": self.company_name,
            "email": self.email,
            "phone": self.phone,
            "website": self.website,
            "message": self.message,
            "pageUri": self.context.page_uri,
        })
    }
}

/// 提交处理阶段
///
/// `Received → Validated → (RiskChecked) → Dispatched → Responded`，
/// 两个拒绝状态只可能出现在 `Dispatched` 之前
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Validated,
    RiskChecked,
    Dispatched,
    Responded,
    RejectedInvalid,
    RejectedRiskFailed,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStage::Received => "received",
            SubmissionStage::Validated => "validated",
            SubmissionStage::RiskChecked => "risk_checked",
            SubmissionStage::Dispatched => "dispatched",
            SubmissionStage::Responded => "responded",
            SubmissionStage::RejectedInvalid => "rejected_invalid",
            SubmissionStage::RejectedRiskFailed => "rejected_risk_failed",
        };
        f.write_str(label)
    }
}
