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

use crate::domain::models::job::Job;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::job as job_entity;
use async_trait::async_trait;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

/// 职位仓库实现
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的职位仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<Job> for job_entity::ActiveModel {
    fn from(job: Job) -> Self {
        Self {
            id: Set(job.id),
            org_id: Set(job.org_id),
            company_id: Set(job.company_id),
            external_id: Set(job.external_id),
            title: Set(job.title),
            location: Set(job.location),
            url: Set(job.url),
            posted_at: Set(job.posted_at),
            created_at: Set(job.created_at),
        }
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn insert_skip_conflict(&self, job: &Job) -> Result<bool, RepositoryError> {
        let model: job_entity::ActiveModel = job.clone().into();

        // Duplicate external ids are silently dropped by the unique index
        let inserted = job_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::column(job_entity::Column::ExternalId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(inserted > 0)
    }
}
