// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 提交结果计数，标签 `outcome`
pub const SUBMISSIONS_TOTAL: &str = "leadrelay_submissions_total";
/// 集成投递计数，标签 `integration` 与 `status`
pub const INTEGRATION_DELIVERIES_TOTAL: &str = "leadrelay_integration_deliveries_total";

pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::warn!("Invalid metrics address '{}': {}. Metrics disabled.", listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(SUBMISSIONS_TOTAL, "Contact submissions by outcome");
    describe_counter!(
        INTEGRATION_DELIVERIES_TOTAL,
        "Integration delivery attempts by integration and status"
    );

    info!("Metrics exporter listening on {}", addr);
}

/// 记录一次提交结果
pub fn record_submission(outcome: &'static str) {
    metrics::counter!(SUBMISSIONS_TOTAL, "outcome" => outcome).increment(1);
}
