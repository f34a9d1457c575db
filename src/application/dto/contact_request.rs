// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::submission::{ClientContext, ContactSubmission};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 联系表单请求数据传输对象
///
/// 缺失的必填字段按空字符串处理，从而得到字段级的校验信息而不是解析错误
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestDto {
    /// 名
    #[serde(default)]
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    /// 姓
    #[serde(default)]
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    /// 公司名称
    #[serde(default)]
    #[validate(length(min = 1, message = "companyName is required"))]
    pub company_name: String,
    /// 联系邮箱
    #[serde(default)]
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    pub email: String,
    /// 电话（可选）
    #[serde(default)]
    pub phone: Option<String>,
    /// 公司网站
    #[serde(default)]
    #[validate(length(min = 1, message = "website is required"))]
    pub website: String,
    /// 留言内容
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    /// 人机验证令牌（可选）
    #[serde(default)]
    pub recaptcha_token: Option<String>,
}

impl ContactRequestDto {
    /// 转换为领域实体，同时取出验证令牌
    pub fn into_submission(self, context: ClientContext) -> (ContactSubmission, Option<String>) {
        let token = self
            .recaptcha_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let submission = ContactSubmission {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            company_name: self.company_name,
            email: self.email,
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            website: self.website,
            message: self.message,
            submitted_at: Utc::now(),
            context,
        };

        (submission, token)
    }
}
