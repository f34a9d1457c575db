// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::AttributionSettings;
use crate::domain::models::submission::ContactSubmission;
use crate::domain::services::integration::{Integration, IntegrationError};
use async_trait::async_trait;
use serde::Serialize;

/// 表单字段所属对象类型（联系人）
const CONTACT_OBJECT_TYPE: &str = "0-1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub object_type_id: &'static str,
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hutk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_uri: Option<String>,
    pub page_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// 表单提交请求体
#[derive(Debug, Serialize)]
pub struct FormSubmission {
    pub fields: Vec<FormField>,
    pub context: FormContext,
}

/// 营销归因服务实现（HubSpot Forms 接口）
///
/// 未配置门户或表单 ID 时不启用
pub struct AttributionServiceImpl {
    client: reqwest::Client,
    api_base_url: String,
    portal_id: Option<String>,
    form_id: Option<String>,
    page_name: String,
}

impl AttributionServiceImpl {
    pub fn new(client: reqwest::Client, settings: &AttributionSettings) -> Self {
        Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            portal_id: settings.portal_id().map(str::to_string),
            form_id: settings.form_id().map(str::to_string),
            page_name: settings.page_name.clone(),
        }
    }

    /// 按固定映射组装表单字段
    pub fn build_payload(&self, submission: &ContactSubmission) -> FormSubmission {
        let field = |name: &'static str, value: &str| FormField {
            object_type_id: CONTACT_OBJECT_TYPE,
            name,
            value: value.to_string(),
        };

        let mut fields = vec![
            field("firstname", &submission.first_name),
            field("lastname", &submission.last_name),
            field("company", &submission.company_name),
            field("email", &submission.email),
        ];
        if let Some(phone) = submission.phone.as_deref() {
            fields.push(field("phone", phone));
        }
        fields.push(field("website", &submission.website));
        fields.push(field("message", &submission.message));

        FormSubmission {
            fields,
            context: FormContext {
                hutk: submission.context.tracking_cookie.clone(),
                page_uri: submission.context.page_uri.clone(),
                page_name: self.page_name.clone(),
                ip_address: submission.context.ip.clone(),
            },
        }
    }
}

#[async_trait]
impl Integration for AttributionServiceImpl {
    fn name(&self) -> &'static str {
        "attribution"
    }

    fn is_enabled(&self) -> bool {
        self.portal_id.is_some() && self.form_id.is_some()
    }

    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), IntegrationError> {
        let (Some(portal_id), Some(form_id)) = (&self.portal_id, &self.form_id) else {
            return Ok(());
        };

        let url = format!(
            "{}/submissions/v3/integration/submit/{}/{}",
            self.api_base_url,
            urlencoding::encode(portal_id),
            urlencoding::encode(form_id)
        );

        let response = self
            .client
            .post(url)
            .json(&self.build_payload(submission))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntegrationError::from_response(response).await);
        }

        Ok(())
    }
}
