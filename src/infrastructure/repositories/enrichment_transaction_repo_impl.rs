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

use crate::domain::models::enrichment::EnrichmentTransaction;
use crate::domain::repositories::enrichment_transaction_repository::EnrichmentTransactionRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::enrichment_transaction as tx_entity;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 充实事务仓库实现
#[derive(Clone)]
pub struct EnrichmentTransactionRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl EnrichmentTransactionRepositoryImpl {
    /// 创建新的充实事务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<tx_entity::Model> for EnrichmentTransaction {
    fn from(model: tx_entity::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            credits_used: model.credits_used,
            companies_processed: model.companies_processed,
            employees_created: model.employees_created,
            leads_created: model.leads_created,
            cache_hits: model.cache_hits,
            api_fetches: model.api_fetches,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl EnrichmentTransactionRepository for EnrichmentTransactionRepositoryImpl {
    async fn append(
        &self,
        transaction: &EnrichmentTransaction,
    ) -> Result<EnrichmentTransaction, RepositoryError> {
        let active = tx_entity::ActiveModel {
            id: Set(transaction.id),
            org_id: Set(transaction.org_id),
            credits_used: Set(transaction.credits_used),
            companies_processed: Set(transaction.companies_processed),
            employees_created: Set(transaction.employees_created),
            leads_created: Set(transaction.leads_created),
            cache_hits: Set(transaction.cache_hits),
            api_fetches: Set(transaction.api_fetches),
            created_at: Set(transaction.created_at),
        };

        active.insert(self.db.as_ref()).await?;
        Ok(transaction.clone())
    }

    async fn find_by_org(
        &self,
        org_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<EnrichmentTransaction>, RepositoryError> {
        let mut query = tx_entity::Entity::find()
            .filter(tx_entity::Column::OrgId.eq(org_id))
            .order_by_desc(tx_entity::Column::CreatedAt);

        if let Some(limit) = limit {
            query = query.limit(limit as u64);
        }

        let rows = query.all(self.db.as_ref()).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
