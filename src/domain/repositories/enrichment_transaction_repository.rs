// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::enrichment::EnrichmentTransaction;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 充实事务仓库特质
#[async_trait]
pub trait EnrichmentTransactionRepository: Send + Sync {
    /// 追加一条批处理审计记录
    async fn append(
        &self,
        transaction: &EnrichmentTransaction,
    ) -> Result<EnrichmentTransaction, RepositoryError>;
    /// 查询组织的审计记录，按创建时间倒序
    async fn find_by_org(
        &self,
        org_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<EnrichmentTransaction>, RepositoryError>;
}
