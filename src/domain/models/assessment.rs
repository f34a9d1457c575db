// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 风险评估请求
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    /// 客户端提交的验证令牌
    pub token: String,
    /// 期望的动作名称
    pub expected_action: String,
    /// 客户端IP
    pub user_ip: Option<String>,
    /// 客户端 User-Agent
    pub user_agent: Option<String>,
}

/// 风险评估结果
///
/// 由验证提供方返回，仅使用一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 令牌是否有效
    pub valid: bool,
    /// 风险分数，0.0（机器人）到 1.0（真人）
    pub score: f64,
    /// 令牌中携带的动作名称
    pub action: String,
    /// 令牌签发的主机名
    pub hostname: Option<String>,
    /// 令牌无效的原因
    pub invalid_reason: Option<String>,
}
