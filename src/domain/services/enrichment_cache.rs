// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::enrichment::ContactRecord;
use crate::domain::repositories::employee_cache_repository::EmployeeCacheRepository;
use crate::domain::repositories::RepositoryError;
use crate::providers::traits::{ContactEnrichmentProvider, ProviderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// 充实缓存网关错误类型
#[derive(Error, Debug)]
pub enum GatewayError {
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// 外部数据源错误
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// 网关返回的联系人集合
#[derive(Debug, Clone)]
pub struct GatewayResult {
    /// 联系人记录
    pub records: Vec<ContactRecord>,
    /// 外部源报告的总可用人数
    pub total_available: i32,
    /// 是否命中缓存（命中时未发生任何外部检索调用）
    pub cache_hit: bool,
}

/// 充实缓存网关
///
/// 缓存优先的联系人获取：缓存新鲜则直接返回，不触发外部
/// 检索；未命中或过期则调用外部源并回写缓存。缺少可用邮箱
/// 的记录再通过批量匹配补齐，合并规则为：匹配结果优先，
/// 缓存值次之，已有非空值绝不被空值覆盖。
pub struct EnrichmentCacheGateway {
    cache_repo: Arc<dyn EmployeeCacheRepository>,
    provider: Arc<dyn ContactEnrichmentProvider>,
    /// 缓存新鲜度窗口（小时）
    cache_ttl_hours: i64,
    /// 批量匹配单次请求的最大 ID 数
    bulk_match_chunk_size: usize,
}

impl EnrichmentCacheGateway {
    /// 创建新的充实缓存网关实例
    pub fn new(
        cache_repo: Arc<dyn EmployeeCacheRepository>,
        provider: Arc<dyn ContactEnrichmentProvider>,
        cache_ttl_hours: i64,
        bulk_match_chunk_size: usize,
    ) -> Self {
        Self {
            cache_repo,
            provider,
            cache_ttl_hours,
            bulk_match_chunk_size,
        }
    }

    /// 获取某域名的联系人集合
    ///
    /// # 参数
    ///
    /// * `domain` - 公司域名
    /// * `titles` - 职位头衔过滤（仅外部检索时生效）
    /// * `seniorities` - 资历级别过滤（仅外部检索时生效）
    /// * `fetch_all` - 是否抓取全部可用联系人
    pub async fn fetch_employees(
        &self,
        domain: &str,
        titles: &[String],
        seniorities: &[String],
        fetch_all: bool,
    ) -> Result<GatewayResult, GatewayError> {
        let cached = self.cache_repo.find_by_domain(domain).await?;

        let (mut records, total_available, cache_hit) = match cached {
            Some(entry) if !entry.is_stale(self.cache_ttl_hours) => {
                debug!(domain, employees = entry.employees.len(), "Employee cache hit");
                (entry.employees, entry.total_available, true)
            }
            _ => {
                debug!(domain, "Employee cache miss, fetching from provider");
                let search = self
                    .provider
                    .search_people(domain, titles, seniorities, fetch_all)
                    .await?;
                self.cache_repo
                    .store(domain, &search.people, search.total)
                    .await?;
                (search.people, search.total, false)
            }
        };

        let upgraded = self.upgrade_missing_emails(&mut records).await;
        if upgraded {
            // Persist unlocked emails without refreshing the freshness window
            if let Err(e) = self.cache_repo.update_records(domain, &records).await {
                warn!(domain, error = %e, "Failed to persist bulk-matched emails");
            }
        }

        Ok(GatewayResult {
            records,
            total_available,
            cache_hit,
        })
    }

    /// 批量补齐缺少可用邮箱的记录，返回是否有任何记录被升级
    async fn upgrade_missing_emails(&self, records: &mut [ContactRecord]) -> bool {
        let missing_ids: Vec<String> = records
            .iter()
            .filter(|r| !r.has_usable_email())
            .map(|r| r.apollo_id.clone())
            .collect();

        if missing_ids.is_empty() {
            return false;
        }

        let mut matched: Vec<ContactRecord> = Vec::new();
        for chunk in missing_ids.chunks(self.bulk_match_chunk_size) {
            match self.provider.bulk_match(chunk).await {
                Ok(batch) => matched.extend(batch),
                Err(e) => {
                    // Best effort: unmatched records keep their cached values
                    warn!(error = %e, ids = chunk.len(), "Bulk match chunk failed");
                }
            }
        }

        if matched.is_empty() {
            return false;
        }

        let mut upgraded = false;
        for record in records.iter_mut() {
            let Some(m) = matched.iter().find(|m| m.apollo_id == record.apollo_id) else {
                continue;
            };

            // Match result wins, cached value second, never null over a value
            if m.has_usable_email() {
                record.email = m.email.clone();
                record.email_status = m.email_status.clone().or(record.email_status.take());
                upgraded = true;
            }
            if record.phone.is_none() && m.phone.is_some() {
                record.phone = m.phone.clone();
                upgraded = true;
            }
            if record.linkedin_url.is_none() && m.linkedin_url.is_some() {
                record.linkedin_url = m.linkedin_url.clone();
                upgraded = true;
            }
        }

        upgraded
    }
}

#[cfg(test)]
#[path = "enrichment_cache_test.rs"]
mod tests;
