// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::scraper_run_repository::ScraperRunRepository;
use crate::domain::repositories::RepositoryError;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 合成的超时失败信息，写入被回收运行的 error_message
const STALE_MESSAGE: &str = "Scraper run timed out";

/// 过期运行清理服务
///
/// 回收进程崩溃后遗留的运行记录：开始时间早于阈值且仍处于
/// queued/running 态的记录被统一标记为失败。作为调度前置步骤
/// 运行，是孤儿记录的唯一恢复机制。幂等：连续运行两次而没有
/// 新的过期记录时，第二次是空操作。
pub struct StaleRunReaper {
    run_repo: Arc<dyn ScraperRunRepository>,
    /// 过期阈值
    threshold: chrono::Duration,
}

impl StaleRunReaper {
    /// 创建新的过期运行清理服务实例
    pub fn new(run_repo: Arc<dyn ScraperRunRepository>, threshold: chrono::Duration) -> Self {
        Self {
            run_repo,
            threshold,
        }
    }

    /// 清理某搜索下的过期运行
    ///
    /// # 返回值
    ///
    /// 返回被标记为失败的运行数量
    pub async fn reap(&self, search_id: Uuid) -> Result<u64, RepositoryError> {
        let reaped = self
            .run_repo
            .fail_stale(search_id, self.threshold, STALE_MESSAGE)
            .await?;

        if reaped > 0 {
            info!(search_id = %search_id, reaped, "Reaped stale scraper runs");
        }

        Ok(reaped)
    }
}

#[cfg(test)]
#[path = "stale_run_reaper_test.rs"]
mod tests;
