// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    models::credits::{CreditHistory, CreditOperation, CreditUsage},
    repositories::credits_repository::{CreditsRepository, CreditsRepositoryError},
};

use crate::infrastructure::database::entities::{credit_history, credit_usage};

pub struct CreditsRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl CreditsRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn usage_row(
        &self,
        org_id: Uuid,
    ) -> Result<Option<credit_usage::Model>, CreditsRepositoryError> {
        let row = credit_usage::Entity::find()
            .filter(credit_usage::Column::OrgId.eq(org_id))
            .one(self.db.as_ref())
            .await?;
        Ok(row)
    }
}

impl From<credit_usage::Model> for CreditUsage {
    fn from(model: credit_usage::Model) -> Self {
        Self {
            id: model.id,
            org_id: model.org_id,
            credits_used: model.credits_used,
            credits_limit: model.credits_limit,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[async_trait]
impl CreditsRepository for CreditsRepositoryImpl {
    async fn get_usage(&self, org_id: Uuid) -> Result<CreditUsage, CreditsRepositoryError> {
        self.usage_row(org_id)
            .await?
            .map(Into::into)
            .ok_or(CreditsRepositoryError::CreditsNotFound(org_id))
    }

    async fn debit(
        &self,
        org_id: Uuid,
        amount: i64,
        operation: CreditOperation,
        description: String,
        reference_id: Option<Uuid>,
    ) -> Result<i64, CreditsRepositoryError> {
        // Single atomic increment; concurrent debits never lose updates
        let result = credit_usage::Entity::update_many()
            .col_expr(
                credit_usage::Column::CreditsUsed,
                Expr::col(credit_usage::Column::CreditsUsed).add(amount),
            )
            .col_expr(
                credit_usage::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(credit_usage::Column::OrgId.eq(org_id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(CreditsRepositoryError::CreditsNotFound(org_id));
        }

        let usage = self
            .usage_row(org_id)
            .await?
            .ok_or(CreditsRepositoryError::CreditsNotFound(org_id))?;
        let balance_after = usage.credits_limit - usage.credits_used;

        let history = credit_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            org_id: Set(org_id),
            amount: Set(amount),
            operation: Set(operation.to_string()),
            description: Set(description),
            reference_id: Set(reference_id),
            balance_after: Set(balance_after),
            created_at: Set(Utc::now().fixed_offset()),
        };
        history.insert(self.db.as_ref()).await?;

        Ok(balance_after)
    }

    async fn history(
        &self,
        org_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<CreditHistory>, CreditsRepositoryError> {
        let mut query = credit_history::Entity::find()
            .filter(credit_history::Column::OrgId.eq(org_id))
            .order_by_desc(credit_history::Column::CreatedAt);

        if let Some(limit) = limit {
            query = query.limit(limit as u64);
        }

        let rows = query.all(self.db.as_ref()).await?;

        Ok(rows
            .into_iter()
            .map(|r| CreditHistory {
                id: r.id,
                org_id: r.org_id,
                amount: r.amount,
                operation: r
                    .operation
                    .parse()
                    .unwrap_or(CreditOperation::ManualAdjustment),
                description: r.description,
                reference_id: r.reference_id,
                balance_after: r.balance_after,
                created_at: r.created_at.into(),
            })
            .collect())
    }

    async fn initialize_org_credits(
        &self,
        org_id: Uuid,
        credits_limit: i64,
    ) -> Result<CreditUsage, CreditsRepositoryError> {
        if let Some(existing) = self.usage_row(org_id).await? {
            return Ok(existing.into());
        }

        let row = credit_usage::ActiveModel {
            id: Set(Uuid::new_v4()),
            org_id: Set(org_id),
            credits_used: Set(0),
            credits_limit: Set(credits_limit),
            created_at: Set(Utc::now().fixed_offset()),
            updated_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = row.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }
}
