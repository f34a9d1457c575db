// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::submission::ContactSubmission;
use crate::domain::services::integration::Integration;
use crate::infrastructure::metrics::INTEGRATION_DELIVERIES_TOTAL;
use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 单个集成的投递结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// 投递成功
    Delivered,
    /// 未配置，跳过
    Skipped,
    /// 投递失败（原因仅记录在日志中）
    Failed(String),
}

impl DeliveryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::Skipped => "skipped",
            DeliveryOutcome::Failed(_) => "failed",
        }
    }
}

/// 分发报告
///
/// 只用于日志和指标，不影响返回给提交者的结果
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<(&'static str, DeliveryOutcome)>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Delivered))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&DeliveryOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// 分发服务
///
/// 将同一次提交并发投递给所有已启用的集成，并等待全部结束。
/// 任何一个集成失败（包括 panic）都不会取消或延迟其他集成。
pub struct DispatchService {
    integrations: Vec<Arc<dyn Integration>>,
}

impl DispatchService {
    pub fn new(integrations: Vec<Arc<dyn Integration>>) -> Self {
        Self { integrations }
    }

    /// 已启用集成的名称
    pub fn enabled_integrations(&self) -> Vec<&'static str> {
        self.integrations
            .iter()
            .filter(|i| i.is_enabled())
            .map(|i| i.name())
            .collect()
    }

    /// 并发投递并汇总结果
    pub async fn dispatch(&self, submission: &ContactSubmission) -> DispatchReport {
        let deliveries = self
            .integrations
            .iter()
            .map(|integration| Self::deliver_one(integration.as_ref(), submission));

        let outcomes = join_all(deliveries).await;
        let report = DispatchReport { outcomes };

        info!(
            submission_id = %submission.id,
            delivered = report.delivered(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Submission dispatch settled"
        );

        report
    }

    async fn deliver_one(
        integration: &dyn Integration,
        submission: &ContactSubmission,
    ) -> (&'static str, DeliveryOutcome) {
        let name = integration.name();

        let outcome = if !integration.is_enabled() {
            debug!(
                submission_id = %submission.id,
                integration = name,
                "Integration not configured, skipping"
            );
            DeliveryOutcome::Skipped
        } else {
            match AssertUnwindSafe(integration.deliver(submission))
                .catch_unwind()
                .await
            {
                Ok(Ok(())) => {
                    info!(
                        submission_id = %submission.id,
                        integration = name,
                        "Integration delivery succeeded"
                    );
                    DeliveryOutcome::Delivered
                }
                Ok(Err(e)) => {
                    error!(
                        submission_id = %submission.id,
                        integration = name,
                        error = %e,
                        "Integration delivery failed"
                    );
                    DeliveryOutcome::Failed(e.to_string())
                }
                Err(_) => {
                    error!(
                        submission_id = %submission.id,
                        integration = name,
                        "Integration delivery panicked"
                    );
                    DeliveryOutcome::Failed("panicked".to_string())
                }
            }
        };

        metrics::counter!(
            INTEGRATION_DELIVERIES_TOTAL,
            "integration" => name,
            "status" => outcome.label()
        )
        .increment(1);

        (name, outcome)
    }
}
