// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::contact_request::ContactRequestDto;
use crate::application::dto::contact_response::ContactResponseDto;
use crate::application::use_cases::submit_contact::SubmitContactUseCase;
use crate::domain::models::submission::{ClientContext, SubmissionStage};
use crate::presentation::errors::AppError;
use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use std::sync::Arc;
use tracing::debug;

/// 处理联系表单提交
///
/// 只有校验或人机验证失败会返回 400；进入分发阶段后，
/// 无论各集成结果如何都返回 200
pub async fn submit_contact(
    Extension(use_case): Extension<Arc<SubmitContactUseCase>>,
    context: ClientContext,
    payload: Result<Json<ContactRequestDto>, JsonRejection>,
) -> Result<Json<ContactResponseDto>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;

    let receipt = use_case
        .execute(request, context)
        .await
        .map_err(|e| AppError::from_submit(e, use_case.exposes_verification_errors()))?;

    debug!(
        submission_id = %receipt.submission_id,
        stage = %SubmissionStage::Responded,
        failed_integrations = receipt.report.failed(),
        "Contact submission accepted"
    );

    Ok(Json(ContactResponseDto::accepted()))
}
