// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 成功完成的抓取运行数
pub const RUNS_COMPLETED: &str = "prospectrs_scraper_runs_completed_total";
/// 失败（含超时）的抓取运行数
pub const RUNS_FAILED: &str = "prospectrs_scraper_runs_failed_total";
/// 扣减的积分总数
pub const CREDITS_DEBITED: &str = "prospectrs_credits_debited_total";
/// 命中缓存的员工查询数
pub const ENRICHMENT_CACHE_HITS: &str = "prospectrs_enrichment_cache_hits_total";
/// 触发外部检索的员工查询数
pub const ENRICHMENT_API_FETCHES: &str = "prospectrs_enrichment_api_fetches_total";

pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::warn!("Invalid metrics listen address {listen_addr}: {e}, exporter disabled");
            return;
        }
    };

    // Start the exporter
    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
    }

    describe_counter!(RUNS_COMPLETED, "Scraper runs that completed successfully");
    describe_counter!(RUNS_FAILED, "Scraper runs that failed or timed out");
    describe_counter!(CREDITS_DEBITED, "Credits debited across all operations");
    describe_counter!(ENRICHMENT_CACHE_HITS, "Employee lookups served from cache");
    describe_counter!(
        ENRICHMENT_API_FETCHES,
        "Employee lookups that reached the external contact source"
    );

    info!("Metrics exporter listening on {}", addr);
}
