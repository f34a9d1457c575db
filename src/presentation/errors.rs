// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, error};
use validator::ValidationErrors;

use crate::application::use_cases::submit_contact::SubmitError;
use crate::domain::services::risk_verifier::{VerificationError, GENERIC_VERIFICATION_MESSAGE};

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub enum AppError {
    /// 字段校验失败，键为请求中的字段名
    Validation(BTreeMap<String, Vec<String>>),
    /// 请求体不是合法的 JSON
    MalformedBody(String),
    /// 人机验证失败
    Verification {
        error: VerificationError,
        expose_details: bool,
    },
    /// 未处理的内部错误
    Internal(anyhow::Error),
}

impl AppError {
    pub fn from_submit(err: SubmitError, expose_details: bool) -> Self {
        match err {
            SubmitError::Invalid(errors) => AppError::validation(&errors),
            SubmitError::RiskFailed(error) => AppError::Verification {
                error,
                expose_details,
            },
        }
    }

    /// 整理字段错误，字段名转换为请求中的驼峰形式
    pub fn validation(errors: &ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{} is invalid ({})", camel_case(&field), e.code),
                    })
                    .collect();
                (camel_case(&field), messages)
            })
            .collect();
        AppError::Validation(details)
    }
}

/// snake_case → camelCase
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(details) => {
                let message = details
                    .values()
                    .flatten()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "success": false,
                        "error": "Validation failed",
                        "message": message,
                        "details": details,
                    }),
                )
            }
            AppError::MalformedBody(reason) => {
                debug!(reason = %reason, "Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "success": false, "error": "Invalid request body" }),
                )
            }
            AppError::Verification {
                error,
                expose_details,
            } => {
                let mut body = json!({
                    "success": false,
                    "error": GENERIC_VERIFICATION_MESSAGE,
                });
                if expose_details {
                    body["reason"] = json!(error.to_string());
                }
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Internal(err) => {
                error!(error = %err, "Unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
