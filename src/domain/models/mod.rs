// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了联系表单处理流程中的核心实体：
/// - 联系提交（submission）：单次请求生命周期内的表单数据与调用方信息
/// - 风险评估（assessment）：人机验证提供方返回的评估结果
///
/// 这些模型只在单个请求内存在，不做任何持久化。
pub mod assessment;
pub mod submission;
