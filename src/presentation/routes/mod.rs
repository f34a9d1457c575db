// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::submit_contact::SubmitContactUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::handlers::contact_handler;
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route("/api/contact", post(contact_handler::submit_contact))
}

/// 组装完整应用：路由、共享用例、请求追踪与 panic 兜底
pub fn app(use_case: Arc<SubmitContactUseCase>) -> Router {
    with_layers(routes(), use_case)
}

fn with_layers(router: Router, use_case: Arc<SubmitContactUseCase>) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
            .layer(Extension(use_case)),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
