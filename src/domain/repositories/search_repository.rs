// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search::{Search, SearchStatus};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 搜索仓库特质
///
/// 定义搜索数据访问接口
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// 创建新搜索
    async fn create(&self, search: &Search) -> Result<Search, RepositoryError>;
    /// 根据ID查找搜索（限定组织）
    async fn find_by_id(&self, org_id: Uuid, id: Uuid) -> Result<Option<Search>, RepositoryError>;
    /// 更新搜索状态
    async fn set_status(&self, id: Uuid, status: SearchStatus) -> Result<(), RepositoryError>;
    /// 原子累加运行产出的净新增公司数与职位数，并刷新最近运行时间
    async fn record_run_totals(
        &self,
        id: Uuid,
        new_companies: i32,
        jobs_found: i32,
    ) -> Result<(), RepositoryError>;
}
