// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 集成接口（integration）：外部副作用的统一“启用 + 投递”接口
/// - 分发服务（dispatch_service）：并发投递并等待全部结束
/// - 人机验证（risk_verifier）：验证提供方接口与放行策略
pub mod dispatch_service;
pub mod integration;
pub mod risk_verifier;
