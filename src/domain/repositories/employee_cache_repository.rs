// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::enrichment::{ContactRecord, EmployeeCacheEntry};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 员工缓存仓库特质
///
/// 缓存键为公司域名，全组织共享
#[async_trait]
pub trait EmployeeCacheRepository: Send + Sync {
    /// 按域名查找缓存条目
    async fn find_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<EmployeeCacheEntry>, RepositoryError>;
    /// 写入或覆盖域名的缓存条目，刷新抓取时间
    async fn store(
        &self,
        domain: &str,
        employees: &[ContactRecord],
        total_available: i32,
    ) -> Result<EmployeeCacheEntry, RepositoryError>;
    /// 更新已有条目的联系人记录，不改变抓取时间
    async fn update_records(
        &self,
        domain: &str,
        employees: &[ContactRecord],
    ) -> Result<(), RepositoryError>;
}
