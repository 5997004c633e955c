// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{
    credits_handler, enrichment_handler, run_handler, webhook_handler,
};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由；各处理器依赖通过 Extension 层注入
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route("/v1/searches/{id}/run", post(run_handler::trigger_run))
        .route("/v1/searches/{id}/runs", get(run_handler::list_runs))
        .route("/v1/enrichment", post(enrichment_handler::enrich))
        .route("/v1/enrichment/preview", get(enrichment_handler::preview))
        .route("/v1/credits", get(credits_handler::get_credits))
        .route("/v1/webhooks/apollo", post(webhook_handler::apollo_webhook));

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
