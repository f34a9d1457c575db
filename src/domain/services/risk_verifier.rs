// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::assessment::{AssessmentRequest, RiskAssessment};
use async_trait::async_trait;
use thiserror::Error;

/// 返回给调用方的统一验证失败提示
pub const GENERIC_VERIFICATION_MESSAGE: &str =
    "We could not verify your submission. Please refresh the page and try again.";

/// 人机验证错误类型
///
/// 所有变体对调用方都表现为同一个“验证失败”，具体原因只写入服务端日志
#[derive(Error, Debug)]
pub enum VerificationError {
    /// 未提供验证令牌
    #[error("Verification token missing")]
    MissingToken,
    /// 令牌无效
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    /// 动作名称不匹配
    #[error("Action mismatch: expected '{expected}', got '{actual}'")]
    ActionMismatch { expected: String, actual: String },
    /// 分数低于阈值
    #[error("Score {score} below threshold {threshold}")]
    ScoreTooLow { score: f64, threshold: f64 },
    /// 提供方返回错误（凭据、配额等）
    #[error("Provider error: {0}")]
    Provider(String),
    /// 网络请求失败
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl VerificationError {
    /// 日志与指标使用的简短原因标签
    pub fn reason_code(&self) -> &'static str {
        match self {
            VerificationError::MissingToken => "missing_token",
            VerificationError::InvalidToken(_) => "invalid_token",
            VerificationError::ActionMismatch { .. } => "action_mismatch",
            VerificationError::ScoreTooLow { .. } => "low_score",
            VerificationError::Provider(_) => "provider_error",
            VerificationError::Transport(_) => "transport_error",
        }
    }
}

/// 人机验证服务特质
#[async_trait]
pub trait RiskVerifier: Send + Sync {
    /// 调用外部评分服务评估令牌
    ///
    /// 只负责取回评估结果，是否放行由 [`RiskPolicy`] 决定
    async fn assess(&self, request: &AssessmentRequest) -> Result<RiskAssessment, VerificationError>;
}

/// 放行策略
#[derive(Debug, Clone)]
pub struct RiskPolicy {
    /// 期望的动作名称
    pub expected_action: String,
    /// 最低可接受分数（含）
    pub min_score: f64,
}

impl RiskPolicy {
    pub fn new(expected_action: impl Into<String>, min_score: f64) -> Self {
        Self {
            expected_action: expected_action.into(),
            min_score,
        }
    }

    /// 检查评估结果：令牌有效、动作一致、分数不低于阈值
    pub fn evaluate(&self, assessment: &RiskAssessment) -> Result<(), VerificationError> {
        if !assessment.valid {
            let reason = assessment
                .invalid_reason
                .clone()
                .unwrap_or_else(|| "unspecified".to_string());
            return Err(VerificationError::InvalidToken(reason));
        }

        if assessment.action != self.expected_action {
            return Err(VerificationError::ActionMismatch {
                expected: self.expected_action.clone(),
                actual: assessment.action.clone(),
            });
        }

        if assessment.score < self.min_score {
            return Err(VerificationError::ScoreTooLow {
                score: assessment.score,
                threshold: self.min_score,
            });
        }

        Ok(())
    }
}
