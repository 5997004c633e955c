// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::company::Company;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// 公司仓库特质
///
/// 去重键为 (org_id, search_id, lower(name))，数据库层面不强制唯一，
/// 由摄取层通过快照加复核模式维护。
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// 插入公司记录
    async fn insert(&self, company: &Company) -> Result<Company, RepositoryError>;
    /// 加载某搜索范围内 规范化名称 -> 公司ID 的快照
    async fn name_index(
        &self,
        org_id: Uuid,
        search_id: Uuid,
    ) -> Result<HashMap<String, Uuid>, RepositoryError>;
    /// 按规范化名称查找公司（大小写不敏感）
    async fn find_by_name_ci(
        &self,
        org_id: Uuid,
        search_id: Uuid,
        name_key: &str,
    ) -> Result<Option<Company>, RepositoryError>;
    /// 根据ID批量查找公司（限定组织）
    async fn find_by_ids(
        &self,
        org_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Company>, RepositoryError>;
    /// 根据ID查找公司（限定组织）
    async fn find_by_id(&self, org_id: Uuid, id: Uuid)
        -> Result<Option<Company>, RepositoryError>;
    /// 标记公司已完成充实
    async fn mark_enriched(&self, id: Uuid) -> Result<(), RepositoryError>;
}
