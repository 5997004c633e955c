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

use crate::domain::models::scraper_run::{RunCounters, ScraperRun, ScraperRunStatus};
use crate::domain::repositories::scraper_run_repository::ScraperRunRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scraper_run as run_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取运行仓库实现
///
/// 基于SeaORM实现的抓取运行数据访问层
#[derive(Clone)]
pub struct ScraperRunRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScraperRunRepositoryImpl {
    /// 创建新的抓取运行仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<run_entity::Model> for ScraperRun {
    fn from(model: run_entity::Model) -> Self {
        Self {
            id: model.id,
            search_id: model.search_id,
            org_id: model.org_id,
            scraper_index: model.scraper_index,
            config: model.config,
            status: model.status.parse().unwrap_or_default(),
            jobs_found: model.jobs_found,
            companies_found: model.companies_found,
            new_companies: model.new_companies,
            leads_created: model.leads_created,
            error_message: model.error_message,
            duration_ms: model.duration_ms,
            started_at: model.started_at,
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ScraperRun> for run_entity::ActiveModel {
    fn from(run: ScraperRun) -> Self {
        Self {
            id: Set(run.id),
            search_id: Set(run.search_id),
            org_id: Set(run.org_id),
            scraper_index: Set(run.scraper_index),
            config: Set(run.config),
            status: Set(run.status.to_string()),
            jobs_found: Set(run.jobs_found),
            companies_found: Set(run.companies_found),
            new_companies: Set(run.new_companies),
            leads_created: Set(run.leads_created),
            error_message: Set(run.error_message),
            duration_ms: Set(run.duration_ms),
            started_at: Set(run.started_at),
            completed_at: Set(run.completed_at),
            created_at: Set(run.created_at),
            updated_at: Set(run.updated_at),
        }
    }
}

#[async_trait]
impl ScraperRunRepository for ScraperRunRepositoryImpl {
    async fn create(&self, run: &ScraperRun) -> Result<ScraperRun, RepositoryError> {
        let model: run_entity::ActiveModel = run.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(run.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScraperRun>, RepositoryError> {
        let model = run_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_search(&self, search_id: Uuid) -> Result<Vec<ScraperRun>, RepositoryError> {
        let models = run_entity::Entity::find()
            .filter(run_entity::Column::SearchId.eq(search_id))
            .order_by_desc(run_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn mark_running(&self, id: Uuid) -> Result<(), RepositoryError> {
        let now = Utc::now().fixed_offset();

        // Only a queued run may move to running
        run_entity::Entity::update_many()
            .col_expr(
                run_entity::Column::Status,
                Expr::value(ScraperRunStatus::Running.to_string()),
            )
            .col_expr(run_entity::Column::StartedAt, Expr::value(Some(now)))
            .col_expr(run_entity::Column::UpdatedAt, Expr::value(now))
            .filter(run_entity::Column::Id.eq(id))
            .filter(run_entity::Column::Status.eq(ScraperRunStatus::Queued.to_string()))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        counters: &RunCounters,
        duration_ms: i64,
    ) -> Result<(), RepositoryError> {
        let run = self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;
        let completed = run
            .complete(*counters, duration_ms)
            .map_err(|_| RepositoryError::InvalidState)?;

        let mut active: run_entity::ActiveModel = completed.into();
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        error_message: &str,
        duration_ms: Option<i64>,
    ) -> Result<(), RepositoryError> {
        let run = self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;
        let failed = run
            .fail(error_message.to_string(), duration_ms)
            .map_err(|_| RepositoryError::InvalidState)?;

        let mut active: run_entity::ActiveModel = failed.into();
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn fail_stale(
        &self,
        search_id: Uuid,
        older_than: chrono::Duration,
        error_message: &str,
    ) -> Result<u64, RepositoryError> {
        let threshold = Utc::now() - older_than;
        let now = Utc::now().fixed_offset();

        let result = run_entity::Entity::update_many()
            .col_expr(
                run_entity::Column::Status,
                Expr::value(ScraperRunStatus::Failed.to_string()),
            )
            .col_expr(
                run_entity::Column::ErrorMessage,
                Expr::value(Some(error_message.to_string())),
            )
            .col_expr(run_entity::Column::CompletedAt, Expr::value(Some(now)))
            .col_expr(run_entity::Column::UpdatedAt, Expr::value(now))
            .filter(run_entity::Column::SearchId.eq(search_id))
            .filter(run_entity::Column::Status.is_in([
                ScraperRunStatus::Queued.to_string(),
                ScraperRunStatus::Running.to_string(),
            ]))
            .filter(run_entity::Column::StartedAt.lte(threshold))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}
