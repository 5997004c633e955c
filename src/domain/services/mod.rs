// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含跨实体的业务流程：
/// - 结果摄取（result_ingester）：批量去重写入公司、职位和线索
/// - 抓取执行（scraper_executor）：单个运行的生命周期执行
/// - 过期清理（stale_run_reaper）：回收被遗弃的运行记录
/// - 充实缓存网关（enrichment_cache）：缓存优先的联系人获取
pub mod enrichment_cache;
pub mod result_ingester;
pub mod scraper_executor;
pub mod stale_run_reaper;
