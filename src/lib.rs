// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含联系表单提交用例与数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、集成接口与人机验证策略
pub mod domain;

/// 基础设施模块
///
/// 提供外部服务集成，如邮件、CRM、归因表单、Webhook 与人机验证
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和提取器
pub mod presentation;

/// 工具模块
///
/// 提供日志初始化等辅助功能
pub mod utils;
