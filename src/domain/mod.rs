// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含联系表单处理的核心业务逻辑，包括：
/// - 领域模型（models）：提交、调用方上下文与风险评估
/// - 服务（services）：集成接口、分发服务与人机验证策略
///
/// 领域层只定义接口与规则，具体的外部服务调用位于基础设施层。
pub mod models;
pub mod services;
