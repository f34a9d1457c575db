// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};

/// 出站请求使用的 User-Agent
pub const USER_AGENT: &str = concat!("leadrelay/", env!("CARGO_PKG_VERSION"));

/// 创建共享的 HTTP 客户端
///
/// 不设置额外的超时，沿用传输层默认行为
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}
