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

use crate::domain::models::company::{normalize_name, Company};
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::company as company_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 公司仓库实现
///
/// 基于SeaORM实现的公司数据访问层。
/// 名称比较统一通过 lower(name) 完成，与领域层的规范化规则一致。
#[derive(Clone)]
pub struct CompanyRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CompanyRepositoryImpl {
    /// 创建新的公司仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<company_entity::Model> for Company {
    fn from(model: company_entity::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            search_id: model.search_id,
            name: model.name,
            domain: model.domain,
            linkedin_url: model.linkedin_url,
            is_enriched: model.is_enriched,
            enriched_at: model.enriched_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Company> for company_entity::ActiveModel {
    fn from(company: Company) -> Self {
        Self {
            id: Set(company.id),
            org_id: Set(company.org_id),
            search_id: Set(company.search_id),
            name: Set(company.name),
            domain: Set(company.domain),
            linkedin_url: Set(company.linkedin_url),
            is_enriched: Set(company.is_enriched),
            enriched_at: Set(company.enriched_at),
            created_at: Set(company.created_at),
            updated_at: Set(company.updated_at),
        }
    }
}

#[async_trait]
impl CompanyRepository for CompanyRepositoryImpl {
    async fn insert(&self, company: &Company) -> Result<Company, RepositoryError> {
        let model: company_entity::ActiveModel = company.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(company.clone())
    }

    async fn name_index(
        &self,
        org_id: Uuid,
        search_id: Uuid,
    ) -> Result<HashMap<String, Uuid>, RepositoryError> {
        let models = company_entity::Entity::find()
            .filter(company_entity::Column::OrgId.eq(org_id))
            .filter(company_entity::Column::SearchId.eq(search_id))
            .all(self.db.as_ref())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| (normalize_name(&m.name), m.id))
            .collect())
    }

    async fn find_by_name_ci(
        &self,
        org_id: Uuid,
        search_id: Uuid,
        name_key: &str,
    ) -> Result<Option<Company>, RepositoryError> {
        let model = company_entity::Entity::find()
            .filter(company_entity::Column::OrgId.eq(org_id))
            .filter(company_entity::Column::SearchId.eq(search_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(company_entity::Column::Name)))
                    .eq(name_key.to_lowercase()),
            )
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_ids(
        &self,
        org_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Company>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = company_entity::Entity::find()
            .filter(company_entity::Column::OrgId.eq(org_id))
            .filter(company_entity::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(
        &self,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Company>, RepositoryError> {
        let model = company_entity::Entity::find_by_id(id)
            .filter(company_entity::Column::OrgId.eq(org_id))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn mark_enriched(&self, id: Uuid) -> Result<(), RepositoryError> {
        let now = Utc::now().fixed_offset();

        company_entity::Entity::update_many()
            .col_expr(company_entity::Column::IsEnriched, Expr::value(true))
            .col_expr(company_entity::Column::EnrichedAt, Expr::value(Some(now)))
            .col_expr(company_entity::Column::UpdatedAt, Expr::value(now))
            .filter(company_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }
}
