// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含与外部系统交互的具体实现。
///
/// 包含的子模块：
/// - HTTP 客户端（http_client）：所有外部调用共享的 reqwest 客户端
/// - 指标（metrics）：Prometheus 导出器与指标名称
/// - 服务实现（services）：邮件、归因、CRM、Webhook 与人机验证的实现
///
/// 基础设施层依赖领域层的抽象接口，领域层不感知具体的服务提供方。
pub mod http_client;
pub mod metrics;
pub mod services;
