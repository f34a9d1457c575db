// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 提交成功时返回的提示
pub const ACCEPTED_MESSAGE: &str = "Thank you for reaching out. We'll be in touch soon.";

/// 联系表单响应数据传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponseDto {
    pub success: bool,
    pub message: String,
}

impl ContactResponseDto {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: ACCEPTED_MESSAGE.to_string(),
        }
    }
}
