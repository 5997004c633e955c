// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::credits::{CreditHistory, CreditOperation, CreditUsage};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreditsRepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Insufficient credits: available {available}, required {required}")]
    InsufficientCredits { available: i64, required: i64 },
    #[error("Credits not found for organization: {0}")]
    CreditsNotFound(Uuid),
}

#[async_trait]
pub trait CreditsRepository: Send + Sync {
    /// Get the usage row for an organization
    async fn get_usage(&self, org_id: Uuid) -> Result<CreditUsage, CreditsRepositoryError>;

    /// Debit credits in one atomic increment and append a history row.
    /// Returns the balance after the debit.
    async fn debit(
        &self,
        org_id: Uuid,
        amount: i64,
        operation: CreditOperation,
        description: String,
        reference_id: Option<Uuid>,
    ) -> Result<i64, CreditsRepositoryError>;

    /// Get debit history for an organization, newest first
    async fn history(
        &self,
        org_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<CreditHistory>, CreditsRepositoryError>;

    /// Initialize credits for a new organization (if not exists)
    async fn initialize_org_credits(
        &self,
        org_id: Uuid,
        credits_limit: i64,
    ) -> Result<CreditUsage, CreditsRepositoryError>;
}
