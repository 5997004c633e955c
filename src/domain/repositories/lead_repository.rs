// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::lead::Lead;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

/// 线索仓库特质
///
/// 每个员工在一个组织内至多一条线索
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// 插入线索，(org_id, employee_id) 冲突时跳过。
    /// 返回是否实际插入了新行。
    async fn insert_skip_conflict(&self, lead: &Lead) -> Result<bool, RepositoryError>;
    /// 组织内已有线索覆盖的公司ID集合
    async fn company_ids_for_org(&self, org_id: Uuid) -> Result<HashSet<Uuid>, RepositoryError>;
    /// 清除指定员工线索上的电话待送达标记
    async fn clear_phone_pending_for_employees(
        &self,
        employee_ids: &[Uuid],
    ) -> Result<u64, RepositoryError>;
}
