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

use crate::domain::models::search::{Search, SearchStatus};
use crate::domain::repositories::search_repository::SearchRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::search as search_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 搜索仓库实现
///
/// 基于SeaORM实现的搜索数据访问层
#[derive(Clone)]
pub struct SearchRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SearchRepositoryImpl {
    /// 创建新的搜索仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<search_entity::Model> for Search {
    fn from(model: search_entity::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            name: model.name,
            scraper_configs: serde_json::from_value(model.scraper_configs).unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            results_count: model.results_count,
            jobs_count: model.jobs_count,
            last_run_at: model.last_run_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Search> for search_entity::ActiveModel {
    fn from(search: Search) -> Self {
        Self {
            id: Set(search.id),
            org_id: Set(search.org_id),
            name: Set(search.name),
            scraper_configs: Set(serde_json::to_value(&search.scraper_configs)
                .unwrap_or_default()),
            status: Set(search.status.to_string()),
            results_count: Set(search.results_count),
            jobs_count: Set(search.jobs_count),
            last_run_at: Set(search.last_run_at),
            created_at: Set(search.created_at),
            updated_at: Set(search.updated_at),
        }
    }
}

#[async_trait]
impl SearchRepository for SearchRepositoryImpl {
    async fn create(&self, search: &Search) -> Result<Search, RepositoryError> {
        let model: search_entity::ActiveModel = search.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(search.clone())
    }

    async fn find_by_id(&self, org_id: Uuid, id: Uuid) -> Result<Option<Search>, RepositoryError> {
        let model = search_entity::Entity::find_by_id(id)
            .filter(search_entity::Column::OrgId.eq(org_id))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn set_status(&self, id: Uuid, status: SearchStatus) -> Result<(), RepositoryError> {
        search_entity::Entity::update_many()
            .col_expr(
                search_entity::Column::Status,
                Expr::value(status.to_string()),
            )
            .col_expr(
                search_entity::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(search_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn record_run_totals(
        &self,
        id: Uuid,
        new_companies: i32,
        jobs_found: i32,
    ) -> Result<(), RepositoryError> {
        // Atomic increments so concurrent triggers never lose counts
        search_entity::Entity::update_many()
            .col_expr(
                search_entity::Column::ResultsCount,
                Expr::col(search_entity::Column::ResultsCount).add(new_companies),
            )
            .col_expr(
                search_entity::Column::JobsCount,
                Expr::col(search_entity::Column::JobsCount).add(jobs_found),
            )
            .col_expr(
                search_entity::Column::LastRunAt,
                Expr::value(Some(Utc::now().fixed_offset())),
            )
            .col_expr(
                search_entity::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(search_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }
}
