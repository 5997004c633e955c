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

use crate::domain::models::employee::Employee;
use crate::domain::models::enrichment::ContactRecord;
use crate::domain::repositories::employee_repository::EmployeeRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::employee as employee_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 员工仓库实现
///
/// 联系字段只升级：已有非空值绝不被空值覆盖
#[derive(Clone)]
pub struct EmployeeRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl EmployeeRepositoryImpl {
    /// 创建新的员工仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_existing(
        &self,
        org_id: Uuid,
        company_id: Uuid,
        apollo_id: &str,
    ) -> Result<Option<employee_entity::Model>, RepositoryError> {
        let model = employee_entity::Entity::find()
            .filter(employee_entity::Column::OrgId.eq(org_id))
            .filter(employee_entity::Column::CompanyId.eq(company_id))
            .filter(employee_entity::Column::ApolloId.eq(apollo_id))
            .one(self.db.as_ref())
            .await?;

        Ok(model)
    }
}

impl From<employee_entity::Model> for Employee {
    fn from(model: employee_entity::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            company_id: model.company_id,
            apollo_id: model.apollo_id,
            first_name: model.first_name,
            last_name: model.last_name,
            title: model.title,
            email: model.email,
            phone: model.phone,
            linkedin_url: model.linkedin_url,
            is_shortlisted: model.is_shortlisted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Employee> for employee_entity::ActiveModel {
    fn from(employee: Employee) -> Self {
        Self {
            id: Set(employee.id),
            org_id: Set(employee.org_id),
            company_id: Set(employee.company_id),
            apollo_id: Set(employee.apollo_id),
            first_name: Set(employee.first_name),
            last_name: Set(employee.last_name),
            title: Set(employee.title),
            email: Set(employee.email),
            phone: Set(employee.phone),
            linkedin_url: Set(employee.linkedin_url),
            is_shortlisted: Set(employee.is_shortlisted),
            created_at: Set(employee.created_at),
            updated_at: Set(employee.updated_at),
        }
    }
}

#[async_trait]
impl EmployeeRepository for EmployeeRepositoryImpl {
    async fn find_or_create(
        &self,
        org_id: Uuid,
        company_id: Uuid,
        apollo_id: &str,
    ) -> Result<(Employee, bool), RepositoryError> {
        if let Some(existing) = self.find_existing(org_id, company_id, apollo_id).await? {
            return Ok((existing.into(), false));
        }

        let employee = Employee::new(org_id, company_id, apollo_id.to_string());
        let model: employee_entity::ActiveModel = employee.clone().into();
        model.insert(self.db.as_ref()).await?;

        Ok((employee, true))
    }

    async fn upsert_from_record(
        &self,
        org_id: Uuid,
        company_id: Uuid,
        record: &ContactRecord,
    ) -> Result<(Employee, bool), RepositoryError> {
        match self
            .find_existing(org_id, company_id, &record.apollo_id)
            .await?
        {
            Some(existing) => {
                // Upgrade-only merge: fill blanks, never blank out known values
                let mut active: employee_entity::ActiveModel = existing.clone().into();
                let mut changed = false;

                if existing.first_name.is_none() && record.first_name.is_some() {
                    active.first_name = Set(record.first_name.clone());
                    changed = true;
                }
                if existing.last_name.is_none() && record.last_name.is_some() {
                    active.last_name = Set(record.last_name.clone());
                    changed = true;
                }
                if existing.title.is_none() && record.title.is_some() {
                    active.title = Set(record.title.clone());
                    changed = true;
                }
                if existing.email.is_none() && record.has_usable_email() {
                    active.email = Set(record.email.clone());
                    changed = true;
                }
                if existing.phone.is_none() && record.phone.is_some() {
                    active.phone = Set(record.phone.clone());
                    changed = true;
                }
                if existing.linkedin_url.is_none() && record.linkedin_url.is_some() {
                    active.linkedin_url = Set(record.linkedin_url.clone());
                    changed = true;
                }

                if changed {
                    active.updated_at = Set(Utc::now().fixed_offset());
                    let updated = active.update(self.db.as_ref()).await?;
                    Ok((updated.into(), false))
                } else {
                    Ok((existing.into(), false))
                }
            }
            None => {
                let mut employee =
                    Employee::new(org_id, company_id, record.apollo_id.clone());
                // Freshly discovered contacts go straight onto the shortlist
                employee.is_shortlisted = true;
                employee.first_name = record.first_name.clone();
                employee.last_name = record.last_name.clone();
                employee.title = record.title.clone();
                employee.email = record
                    .email
                    .clone()
                    .filter(|_| record.has_usable_email());
                employee.phone = record.phone.clone();
                employee.linkedin_url = record.linkedin_url.clone();

                let model: employee_entity::ActiveModel = employee.clone().into();
                model.insert(self.db.as_ref()).await?;

                Ok((employee, true))
            }
        }
    }

    async fn upgrade_phone_by_apollo_id(
        &self,
        apollo_id: &str,
        phone: &str,
    ) -> Result<Vec<Uuid>, RepositoryError> {
        let models = employee_entity::Entity::find()
            .filter(employee_entity::Column::ApolloId.eq(apollo_id))
            .all(self.db.as_ref())
            .await?;

        let mut upgraded = Vec::new();
        for model in models {
            let id = model.id;
            let mut active: employee_entity::ActiveModel = model.into();
            active.phone = Set(Some(phone.to_string()));
            active.updated_at = Set(Utc::now().fixed_offset());
            active.update(self.db.as_ref()).await?;
            upgraded.push(id);
        }

        Ok(upgraded)
    }
}
