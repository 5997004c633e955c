// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::employee::Employee;
use crate::domain::models::enrichment::ContactRecord;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 员工仓库特质
///
/// 联系字段只升级：已有非空值绝不被空值覆盖
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// 按 (org_id, company_id, apollo_id) 查找或创建员工。
    /// 返回员工记录以及是否为新建。
    async fn find_or_create(
        &self,
        org_id: Uuid,
        company_id: Uuid,
        apollo_id: &str,
    ) -> Result<(Employee, bool), RepositoryError>;
    /// 从外部联系人记录创建或升级员工。
    /// 返回员工记录以及是否为新建。
    async fn upsert_from_record(
        &self,
        org_id: Uuid,
        company_id: Uuid,
        record: &ContactRecord,
    ) -> Result<(Employee, bool), RepositoryError>;
    /// 按外部联系人ID回填电话号码，返回受影响的员工ID
    async fn upgrade_phone_by_apollo_id(
        &self,
        apollo_id: &str,
        phone: &str,
    ) -> Result<Vec<Uuid>, RepositoryError>;
}
