// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::contact_request::ContactRequestDto;
use crate::config::settings::Settings;
use crate::domain::models::assessment::AssessmentRequest;
use crate::domain::models::submission::{ClientContext, ContactSubmission, SubmissionStage};
use crate::domain::services::dispatch_service::{DispatchReport, DispatchService};
use crate::domain::services::risk_verifier::{RiskPolicy, RiskVerifier, VerificationError};
use crate::infrastructure::metrics::record_submission;
use crate::infrastructure::services::build_integrations;
use crate::infrastructure::services::recaptcha_verifier_impl::RecaptchaVerifierImpl;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// 提交被拒绝的原因
///
/// 两种拒绝都发生在分发之前；一旦进入分发阶段，提交必定成功
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),
    #[error("Risk verification failed: {0}")]
    RiskFailed(#[from] VerificationError),
}

/// 已受理提交的回执
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    /// 各集成的投递结果，仅供日志与测试使用
    pub report: DispatchReport,
}

/// 联系表单提交用例
///
/// 校验 → 人机验证（可选）→ 并发分发 → 汇总。
///
/// 尽力投递约定：通过校验与验证后，无论下游集成是否成功，
/// 提交者都会收到受理成功的结果。
pub struct SubmitContactUseCase {
    verifier: Option<Arc<dyn RiskVerifier>>,
    policy: RiskPolicy,
    dispatcher: DispatchService,
    expose_verification_errors: bool,
}

impl SubmitContactUseCase {
    pub fn new(
        verifier: Option<Arc<dyn RiskVerifier>>,
        policy: RiskPolicy,
        dispatcher: DispatchService,
    ) -> Self {
        Self {
            verifier,
            policy,
            dispatcher,
            expose_verification_errors: false,
        }
    }

    /// 在响应中返回验证失败的具体原因（仅调试使用）
    pub fn with_verification_details(mut self, expose: bool) -> Self {
        self.expose_verification_errors = expose;
        self
    }

    /// 根据配置组装用例
    pub fn from_settings(settings: &Settings, client: reqwest::Client) -> Self {
        let recaptcha = &settings.recaptcha;
        if recaptcha.bypass {
            warn!("Risk verification explicitly bypassed");
        }

        let verifier = RecaptchaVerifierImpl::from_settings(client.clone(), recaptcha)
            .map(|v| Arc::new(v) as Arc<dyn RiskVerifier>);
        let policy = RiskPolicy::new(recaptcha.expected_action.clone(), recaptcha.min_score);
        let dispatcher = DispatchService::new(build_integrations(&client, settings));

        info!(
            verification = verifier.is_some(),
            integrations = ?dispatcher.enabled_integrations(),
            "Contact submission pipeline configured"
        );

        Self::new(verifier, policy, dispatcher)
            .with_verification_details(recaptcha.expose_verification_errors)
    }

    pub fn exposes_verification_errors(&self) -> bool {
        self.expose_verification_errors
    }

    /// 处理一次提交
    pub async fn execute(
        &self,
        request: ContactRequestDto,
        context: ClientContext,
    ) -> Result<SubmissionReceipt, SubmitError> {
        debug!(stage = %SubmissionStage::Received, "Contact submission received");

        if let Err(errors) = request.validate() {
            debug!(
                stage = %SubmissionStage::RejectedInvalid,
                "Contact submission failed validation"
            );
            record_submission("rejected_invalid");
            return Err(SubmitError::Invalid(errors));
        }

        let (submission, token) = request.into_submission(context);
        debug!(
            submission_id = %submission.id,
            stage = %SubmissionStage::Validated,
            "Contact submission validated"
        );

        if let Some(verifier) = &self.verifier {
            if let Err(e) = self.verify(verifier.as_ref(), token, &submission).await {
                warn!(
                    submission_id = %submission.id,
                    stage = %SubmissionStage::RejectedRiskFailed,
                    reason = e.reason_code(),
                    error = %e,
                    "Risk verification failed"
                );
                record_submission("rejected_risk");
                return Err(SubmitError::RiskFailed(e));
            }
            debug!(
                submission_id = %submission.id,
                stage = %SubmissionStage::RiskChecked,
                "Risk verification passed"
            );
        }

        debug!(
            submission_id = %submission.id,
            stage = %SubmissionStage::Dispatched,
            "Dispatching submission"
        );
        let report = self.dispatcher.dispatch(&submission).await;
        record_submission("accepted");

        Ok(SubmissionReceipt {
            submission_id: submission.id,
            report,
        })
    }

    async fn verify(
        &self,
        verifier: &dyn RiskVerifier,
        token: Option<String>,
        submission: &ContactSubmission,
    ) -> Result<(), VerificationError> {
        // No provider call without a token
        let token = token.ok_or(VerificationError::MissingToken)?;

        let request = AssessmentRequest {
            token,
            expected_action: self.policy.expected_action.clone(),
            user_ip: submission.context.ip.clone(),
            user_agent: submission.context.user_agent.clone(),
        };

        let assessment = verifier.assess(&request).await?;
        debug!(
            submission_id = %submission.id,
            score = assessment.score,
            action = %assessment.action,
            hostname = ?assessment.hostname,
            "Risk assessment received"
        );
        self.policy.evaluate(&assessment)
    }
}
