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

use crate::domain::models::lead::Lead;
use crate::domain::repositories::lead_repository::LeadRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::lead as lead_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// 线索仓库实现
#[derive(Clone)]
pub struct LeadRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl LeadRepositoryImpl {
    /// 创建新的线索仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<lead_entity::Model> for Lead {
    fn from(model: lead_entity::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            company_id: model.company_id,
            employee_id: model.employee_id,
            status: model.status.parse().unwrap_or_default(),
            metadata: model.metadata,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Lead> for lead_entity::ActiveModel {
    fn from(lead: Lead) -> Self {
        Self {
            id: Set(lead.id),
            org_id: Set(lead.org_id),
            company_id: Set(lead.company_id),
            employee_id: Set(lead.employee_id),
            status: Set(lead.status.to_string()),
            metadata: Set(lead.metadata),
            created_at: Set(lead.created_at),
            updated_at: Set(lead.updated_at),
        }
    }
}

#[async_trait]
impl LeadRepository for LeadRepositoryImpl {
    async fn insert_skip_conflict(&self, lead: &Lead) -> Result<bool, RepositoryError> {
        let model: lead_entity::ActiveModel = lead.clone().into();

        // At most one lead per employee within an organization
        let inserted = lead_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    lead_entity::Column::OrgId,
                    lead_entity::Column::EmployeeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(inserted > 0)
    }

    async fn company_ids_for_org(&self, org_id: Uuid) -> Result<HashSet<Uuid>, RepositoryError> {
        let models = lead_entity::Entity::find()
            .filter(lead_entity::Column::OrgId.eq(org_id))
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(|m| m.company_id).collect())
    }

    async fn clear_phone_pending_for_employees(
        &self,
        employee_ids: &[Uuid],
    ) -> Result<u64, RepositoryError> {
        if employee_ids.is_empty() {
            return Ok(0);
        }

        let models = lead_entity::Entity::find()
            .filter(lead_entity::Column::EmployeeId.is_in(employee_ids.to_vec()))
            .all(self.db.as_ref())
            .await?;

        let mut cleared = 0u64;
        for model in models {
            let pending = model
                .metadata
                .get("phone_pending")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if !pending {
                continue;
            }

            let mut metadata = model.metadata.clone();
            if let Some(map) = metadata.as_object_mut() {
                map.remove("phone_pending");
            }

            let mut active: lead_entity::ActiveModel = model.into();
            active.metadata = Set(metadata);
            active.updated_at = Set(Utc::now().fixed_offset());
            active.update(self.db.as_ref()).await?;
            cleared += 1;
        }

        Ok(cleared)
    }
}
