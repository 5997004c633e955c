// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scraper_run::{RunCounters, ScraperRun};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 抓取运行仓库特质
///
/// 定义抓取运行记录的数据访问接口
#[async_trait]
pub trait ScraperRunRepository: Send + Sync {
    /// 创建新的运行记录
    async fn create(&self, run: &ScraperRun) -> Result<ScraperRun, RepositoryError>;
    /// 根据ID查找运行记录
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScraperRun>, RepositoryError>;
    /// 查找某搜索的全部运行记录，按创建时间倒序
    async fn find_by_search(&self, search_id: Uuid) -> Result<Vec<ScraperRun>, RepositoryError>;
    /// 标记运行开始，刷新开始时间
    async fn mark_running(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 标记运行成功完成并写入计数
    async fn mark_completed(
        &self,
        id: Uuid,
        counters: &RunCounters,
        duration_ms: i64,
    ) -> Result<(), RepositoryError>;
    /// 标记运行失败
    async fn mark_failed(
        &self,
        id: Uuid,
        error_message: &str,
        duration_ms: Option<i64>,
    ) -> Result<(), RepositoryError>;
    /// 将某搜索中开始时间早于阈值的未终态运行批量标记为失败，
    /// 返回被处理的行数
    async fn fail_stale(
        &self,
        search_id: Uuid,
        older_than: chrono::Duration,
        error_message: &str,
    ) -> Result<u64, RepositoryError>;
}
