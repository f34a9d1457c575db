// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrmSettings;
use crate::domain::models::submission::ContactSubmission;
use crate::domain::services::integration::{Integration, IntegrationError};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

/// 笔记关联到联系人的关联类型 ID
const NOTE_TO_CONTACT_ASSOCIATION: u32 = 202;

#[derive(Debug, Deserialize)]
struct CrmObject {
    id: String,
}

/// CRM 服务实现（HubSpot CRM v3 接口）
///
/// 先创建联系人，遇到 409 冲突时按邮箱更新已有联系人，
/// 成功后为该联系人添加一条包含留言内容的笔记
pub struct CrmServiceImpl {
    client: reqwest::Client,
    api_base_url: String,
    access_token: Option<String>,
}

impl CrmServiceImpl {
    pub fn new(client: reqwest::Client, settings: &CrmSettings) -> Self {
        Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            access_token: settings.access_token().map(str::to_string),
        }
    }

    fn token(&self) -> &str {
        self.access_token.as_deref().unwrap_or_default()
    }

    fn contact_properties(submission: &ContactSubmission) -> Value {
        let mut properties = json!({
            "email": submission.email,
            "firstname": submission.first_name,
            "lastname": submission.last_name,
            "company": submission.company_name,
            "website": submission.website,
        });
        if let Some(phone) = submission.phone.as_deref() {
            properties["phone"] = json!(phone);
        }
        json!({ "properties": properties })
    }

    /// 创建或更新联系人，返回联系人 ID
    pub async fn upsert_contact(
        &self,
        submission: &ContactSubmission,
    ) -> Result<String, IntegrationError> {
        let body = Self::contact_properties(submission);

        let response = self
            .client
            .post(format!("{}/crm/v3/objects/contacts", self.api_base_url))
            .bearer_auth(self.token())
            .json(&body)
            .send()
            .await?;

        let response = if response.status() == StatusCode::CONFLICT {
            info!(
                submission_id = %submission.id,
                "CRM contact already exists, updating by email"
            );
            self.client
                .patch(format!(
                    "{}/crm/v3/objects/contacts/{}",
                    self.api_base_url,
                    urlencoding::encode(&submission.email)
                ))
                .query(&[("idProperty", "email")])
                .bearer_auth(self.token())
                .json(&body)
                .send()
                .await?
        } else {
            response
        };

        if !response.status().is_success() {
            return Err(IntegrationError::from_response(response).await);
        }

        let contact: CrmObject = response
            .json()
            .await
            .map_err(|e| IntegrationError::InvalidResponse(e.to_string()))?;
        Ok(contact.id)
    }

    /// 为联系人添加笔记
    pub async fn create_note(&self, contact_id: &str, message: &str) -> Result<String, IntegrationError> {
        let body = json!({
            "properties": {
                "hs_timestamp": Utc::now().to_rfc3339(),
                "hs_note_body": message,
            },
            "associations": [{
                "to": { "id": contact_id },
                "types": [{
                    "associationCategory": "HUBSPOT_DEFINED",
                    "associationTypeId": NOTE_TO_CONTACT_ASSOCIATION,
                }],
            }],
        });

        let response = self
            .client
            .post(format!("{}/crm/v3/objects/notes", self.api_base_url))
            .bearer_auth(self.token())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntegrationError::from_response(response).await);
        }

        let note: CrmObject = response
            .json()
            .await
            .map_err(|e| IntegrationError::InvalidResponse(e.to_string()))?;
        Ok(note.id)
    }
}

#[async_trait]
impl Integration for CrmServiceImpl {
    fn name(&self) -> &'static str {
        "crm"
    }

    fn is_enabled(&self) -> bool {
        self.access_token.is_some()
    }

    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), IntegrationError> {
        let contact_id = self.upsert_contact(submission).await?;
        let note_id = self.create_note(&contact_id, &submission.message).await?;

        debug!(
            submission_id = %submission.id,
            contact_id = %contact_id,
            note_id = %note_id,
            "CRM contact upserted with note"
        );
        Ok(())
    }
}
