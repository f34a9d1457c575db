// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LEADRELAY";

/// 应用程序配置设置
///
/// 启动时解析一次，各集成是否启用完全由对应配置段是否完整决定
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
    /// 人机验证 (reCAPTCHA Enterprise) 配置
    pub recaptcha: RecaptchaSettings,
    /// 邮件通知配置
    pub email: EmailSettings,
    /// 营销归因表单配置
    pub attribution: AttributionSettings,
    /// CRM 配置
    pub crm: CrmSettings,
    /// 自动化 Webhook 配置
    #[serde(default)]
    pub webhooks: WebhookSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

/// 人机验证配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RecaptchaSettings {
    /// Google Cloud 项目 ID
    pub project_id: Option<String>,
    /// 站点密钥
    pub site_key: Option<String>,
    /// API 密钥（与 access_token 二选一）
    pub api_key: Option<String>,
    /// OAuth 访问令牌
    pub access_token: Option<String>,
    /// 期望的动作名称
    pub expected_action: String,
    /// 最低可接受分数
    pub min_score: f64,
    /// 本地测试时跳过验证
    pub bypass: bool,
    /// 是否在响应中返回具体失败原因（仅用于调试）
    pub expose_verification_errors: bool,
    /// API 基础URL
    pub api_base_url: String,
}

/// 邮件通知配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    /// 邮件服务 API 密钥
    pub api_key: Option<String>,
    /// 发件人
    pub from: String,
    /// 收件人
    pub to: Option<String>,
    /// API 基础URL
    pub api_base_url: String,
}

/// 营销归因表单配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AttributionSettings {
    /// 门户 ID
    pub portal_id: Option<String>,
    /// 表单 GUID
    pub form_id: Option<String>,
    /// 上报的页面名称
    pub page_name: String,
    /// API 基础URL
    pub api_base_url: String,
}

/// CRM 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrmSettings {
    /// 私有应用访问令牌
    pub access_token: Option<String>,
    /// API 基础URL
    pub api_base_url: String,
}

/// Webhook配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookSettings {
    /// 目标地址列表（环境变量中以逗号分隔）
    #[serde(default, deserialize_with = "comma_list")]
    pub urls: Vec<String>,
    /// Webhook签名密钥
    pub secret: Option<String>,
}

/// 过滤空字符串形式的可选配置
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl RecaptchaSettings {
    /// 人机验证凭据
    pub fn credential(&self) -> Option<RecaptchaCredential> {
        if let Some(key) = present(&self.api_key) {
            return Some(RecaptchaCredential::ApiKey(key.to_string()));
        }
        present(&self.access_token).map(|t| RecaptchaCredential::AccessToken(t.to_string()))
    }

    pub fn project_id(&self) -> Option<&str> {
        present(&self.project_id)
    }

    pub fn site_key(&self) -> Option<&str> {
        present(&self.site_key)
    }

    /// 验证是否启用：提供方配置完整且未被显式跳过
    pub fn is_enabled(&self) -> bool {
        !self.bypass
            && self.project_id().is_some()
            && self.site_key().is_some()
            && self.credential().is_some()
    }
}

/// 注入到验证客户端的内存凭据
#[derive(Clone, PartialEq, Eq)]
pub enum RecaptchaCredential {
    /// 以 `key` 查询参数发送
    ApiKey(String),
    /// 以 Bearer 头发送
    AccessToken(String),
}

impl std::fmt::Debug for RecaptchaCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecaptchaCredential::ApiKey(_) => f.write_str("ApiKey(***)"),
            RecaptchaCredential::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

/// 环境变量给出逗号分隔的字符串，配置文件给出数组，两者都接受
fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(value) => value.split(',').map(str::to_string).collect(),
        StringOrList::Many(values) => values,
    })
}

impl EmailSettings {
    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    pub fn recipient(&self) -> Option<&str> {
        present(&self.to)
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key().is_some() && self.recipient().is_some()
    }
}

impl AttributionSettings {
    pub fn portal_id(&self) -> Option<&str> {
        present(&self.portal_id)
    }

    pub fn form_id(&self) -> Option<&str> {
        present(&self.form_id)
    }

    pub fn is_enabled(&self) -> bool {
        self.portal_id().is_some() && self.form_id().is_some()
    }
}

impl CrmSettings {
    pub fn access_token(&self) -> Option<&str> {
        present(&self.access_token)
    }

    pub fn is_enabled(&self) -> bool {
        self.access_token().is_some()
    }
}

impl WebhookSettings {
    /// 去除空白项后的目标地址
    pub fn targets(&self) -> Vec<String> {
        self.urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn secret(&self) -> Option<&str> {
        present(&self.secret)
    }

    pub fn is_enabled(&self) -> bool {
        !self.targets().is_empty()
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// 使用给定的变量表代替进程环境变量加载配置
    pub fn from_env_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());

        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(vars.map(|v| v.into_iter().collect()));

        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            // Risk verification
            .set_default("recaptcha.expected_action", "contact_form")?
            .set_default("recaptcha.min_score", 0.5)?
            .set_default("recaptcha.bypass", false)?
            .set_default("recaptcha.expose_verification_errors", false)?
            .set_default(
                "recaptcha.api_base_url",
                "https://recaptchaenterprise.googleapis.com",
            )?
            // Integrations
            .set_default("email.from", "Website Contact <noreply@example.com>")?
            .set_default("email.api_base_url", "https://api.resend.com")?
            .set_default("attribution.page_name", "Contact")?
            .set_default("attribution.api_base_url", "https://api.hsforms.com")?
            .set_default("crm.api_base_url", "https://api.hubapi.com")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(environment);

        builder.build()?.try_deserialize()
    }
}
