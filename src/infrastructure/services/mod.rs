// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施服务模块
///
/// 各外部服务提供方的具体实现
pub mod attribution_service_impl;
pub mod crm_service_impl;
pub mod email_service_impl;
pub mod recaptcha_verifier_impl;
pub mod webhook_service_impl;

use crate::config::settings::Settings;
use crate::domain::services::integration::Integration;
use std::sync::Arc;

/// 按配置创建全部集成
///
/// 未配置的集成同样会被创建，由分发服务根据 `is_enabled` 跳过
pub fn build_integrations(
    client: &reqwest::Client,
    settings: &Settings,
) -> Vec<Arc<dyn Integration>> {
    vec![
        Arc::new(email_service_impl::EmailServiceImpl::new(
            client.clone(),
            &settings.email,
        )),
        Arc::new(attribution_service_impl::AttributionServiceImpl::new(
            client.clone(),
            &settings.attribution,
        )),
        Arc::new(crm_service_impl::CrmServiceImpl::new(
            client.clone(),
            &settings.crm,
        )),
        Arc::new(webhook_service_impl::WebhookServiceImpl::new(
            client.clone(),
            &settings.webhooks,
        )),
    ]
}
