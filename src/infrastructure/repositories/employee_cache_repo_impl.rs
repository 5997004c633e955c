// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::enrichment::{ContactRecord, EmployeeCacheEntry};
use crate::domain::repositories::employee_cache_repository::EmployeeCacheRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::employee_cache as cache_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 员工缓存仓库实现
///
/// 缓存键为公司域名，全组织共享
#[derive(Clone)]
pub struct EmployeeCacheRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl EmployeeCacheRepositoryImpl {
    /// 创建新的员工缓存仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn row_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<cache_entity::Model>, RepositoryError> {
        let row = cache_entity::Entity::find()
            .filter(cache_entity::Column::Domain.eq(domain))
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }
}

impl From<cache_entity::Model> for EmployeeCacheEntry {
    fn from(model: cache_entity::Model) -> Self {
        Self {
            id: model.id,
            domain: model.domain,
            employees: serde_json::from_value(model.employees).unwrap_or_default(),
            total_available: model.total_available,
            fetched_at: model.fetched_at,
        }
    }
}

#[async_trait]
impl EmployeeCacheRepository for EmployeeCacheRepositoryImpl {
    async fn find_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<EmployeeCacheEntry>, RepositoryError> {
        Ok(self.row_by_domain(domain).await?.map(Into::into))
    }

    async fn store(
        &self,
        domain: &str,
        employees: &[ContactRecord],
        total_available: i32,
    ) -> Result<EmployeeCacheEntry, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let payload = serde_json::to_value(employees).unwrap_or_default();

        let model = match self.row_by_domain(domain).await? {
            Some(existing) => {
                let mut active: cache_entity::ActiveModel = existing.into();
                active.employees = Set(payload);
                active.total_available = Set(total_available);
                active.fetched_at = Set(now);
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?
            }
            None => {
                let active = cache_entity::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    domain: Set(domain.to_string()),
                    employees: Set(payload),
                    total_available: Set(total_available),
                    fetched_at: Set(now),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(self.db.as_ref()).await?
            }
        };

        Ok(model.into())
    }

    async fn update_records(
        &self,
        domain: &str,
        employees: &[ContactRecord],
    ) -> Result<(), RepositoryError> {
        let existing = self
            .row_by_domain(domain)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        // Keeps fetched_at untouched so the freshness window is unaffected
        let mut active: cache_entity::ActiveModel = existing.into();
        active.employees = Set(serde_json::to_value(employees).unwrap_or_default());
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(self.db.as_ref()).await?;

        Ok(())
    }
}
