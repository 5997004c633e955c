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

use crate::application::dto::enrich_request::EnrichmentRequestDto;
use crate::application::dto::enrich_response::{
    CompanyEnrichmentResultDto, EnrichmentResponseDto, PhoneEnrichmentDto, SkippedCompanyDto,
};
use crate::application::dto::preview_response::{
    CacheStatusDto, CompanyPreviewDto, EnrichmentPreviewResponseDto,
};
use crate::domain::models::company::Company;
use crate::domain::models::credits::CreditOperation;
use crate::domain::models::enrichment::EnrichmentTransaction;
use crate::domain::models::lead::Lead;
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::credits_repository::{
    CreditsRepository, CreditsRepositoryError,
};
use crate::domain::repositories::employee_cache_repository::EmployeeCacheRepository;
use crate::domain::repositories::employee_repository::EmployeeRepository;
use crate::domain::repositories::enrichment_transaction_repository::EnrichmentTransactionRepository;
use crate::domain::repositories::lead_repository::LeadRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::enrichment_cache::EnrichmentCacheGateway;
use crate::infrastructure::metrics::{
    CREDITS_DEBITED, ENRICHMENT_API_FETCHES, ENRICHMENT_CACHE_HITS,
};
use crate::providers::traits::ContactEnrichmentProvider;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 域名缺失时的跳过原因，原样返回给客户端
const NO_DOMAIN_REASON: &str = "No domain available";

/// 充实用例错误类型
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// 积分已耗尽，批处理启动前置检查失败
    #[error("Insufficient credits: {0} remaining")]
    InsufficientCredits(i64),
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// 积分仓库错误
    #[error("Credits error: {0}")]
    Credits(#[from] CreditsRepositoryError),
}

/// 充实用例的运行参数
#[derive(Debug, Clone)]
pub struct EnrichmentOptions {
    /// 相邻公司之间的固定延迟（毫秒），用于遵守外部限流
    pub company_delay_ms: u64,
    /// 员工缓存的新鲜度窗口（小时）
    pub cache_ttl_hours: i64,
    /// 新组织的默认积分额度
    pub default_credit_limit: i64,
    /// 电话号码回调的外部可达基础地址
    pub callback_base_url: String,
}

/// 公司充实用例
///
/// 驱动一个批次的公司充实：域名分拣、缓存优先的联系人获取、
/// 员工与线索写入、电话号码异步排队、一次性积分扣减和审计记录。
/// 单个公司的获取失败只记录在其明细中，不影响批次内的其他公司。
pub struct EnrichCompaniesUseCase {
    company_repo: Arc<dyn CompanyRepository>,
    employee_repo: Arc<dyn EmployeeRepository>,
    lead_repo: Arc<dyn LeadRepository>,
    credits_repo: Arc<dyn CreditsRepository>,
    cache_repo: Arc<dyn EmployeeCacheRepository>,
    transaction_repo: Arc<dyn EnrichmentTransactionRepository>,
    gateway: Arc<EnrichmentCacheGateway>,
    provider: Arc<dyn ContactEnrichmentProvider>,
    options: EnrichmentOptions,
}

impl EnrichCompaniesUseCase {
    /// 创建新的公司充实用例实例
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        company_repo: Arc<dyn CompanyRepository>,
        employee_repo: Arc<dyn EmployeeRepository>,
        lead_repo: Arc<dyn LeadRepository>,
        credits_repo: Arc<dyn CreditsRepository>,
        cache_repo: Arc<dyn EmployeeCacheRepository>,
        transaction_repo: Arc<dyn EnrichmentTransactionRepository>,
        gateway: Arc<EnrichmentCacheGateway>,
        provider: Arc<dyn ContactEnrichmentProvider>,
        options: EnrichmentOptions,
    ) -> Self {
        Self {
            company_repo,
            employee_repo,
            lead_repo,
            credits_repo,
            cache_repo,
            transaction_repo,
            gateway,
            provider,
            options,
        }
    }

    /// 执行一个充实批次
    pub async fn enrich(
        &self,
        org_id: Uuid,
        request: &EnrichmentRequestDto,
    ) -> Result<EnrichmentResponseDto, EnrichmentError> {
        let companies = self
            .resolve_targets(org_id, request.company_ids.as_deref())
            .await?;

        let usage = self.ensure_credits(org_id).await?;
        if usage.is_exhausted() {
            return Err(EnrichmentError::InsufficientCredits(usage.remaining()));
        }

        let (titles, seniorities) = match &request.filters {
            Some(filters) => (filters.titles.clone(), filters.seniorities.clone()),
            None => (Vec::new(), Vec::new()),
        };
        let fetch_all = request.fetch_all.unwrap_or(false);
        let reveal_phones = request.reveal_phone_numbers.unwrap_or(false);

        let mut eligible = Vec::new();
        let mut skipped = Vec::new();
        for company in companies {
            if company.domain.is_some() {
                eligible.push(company);
            } else {
                skipped.push(SkippedCompanyDto {
                    id: company.id,
                    name: company.name,
                    reason: NO_DOMAIN_REASON.to_string(),
                });
            }
        }

        let mut response = EnrichmentResponseDto {
            companies_skipped: skipped.len() as i32,
            ..Default::default()
        };
        let mut pending_apollo_ids: Vec<String> = Vec::new();

        for (i, company) in eligible.iter().enumerate() {
            // Fixed spacing between companies to respect provider rate limits
            if i > 0 && self.options.company_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.options.company_delay_ms)).await;
            }

            let result = self
                .enrich_one(org_id, company, &titles, &seniorities, fetch_all, reveal_phones, &mut pending_apollo_ids)
                .await;

            if result.error.is_none() {
                response.companies_processed += 1;
                if result.cache_hit {
                    counter!(ENRICHMENT_CACHE_HITS).increment(1);
                    response.cache_hits += 1;
                } else {
                    counter!(ENRICHMENT_API_FETCHES).increment(1);
                    response.apollo_fetches += 1;
                }
            }
            response.total_employees_created += result.employees_created;
            response.total_leads_created += result.leads_created;
            response.results.push(result);
        }

        // One debit per batch, counted as leads actually created
        let credits_used = response.total_leads_created as i64;
        if credits_used > 0 {
            let balance = self
                .credits_repo
                .debit(
                    org_id,
                    credits_used,
                    CreditOperation::Enrichment,
                    format!(
                        "Enrichment batch: {} leads created",
                        response.total_leads_created
                    ),
                    None,
                )
                .await?;
            counter!(CREDITS_DEBITED).increment(credits_used as u64);
            debug!(org_id = %org_id, balance_after = balance, "Enrichment credits debited");
        }
        response.total_credits_used = credits_used;

        if reveal_phones && !pending_apollo_ids.is_empty() {
            let webhook_url = format!(
                "{}/v1/webhooks/apollo",
                self.options.callback_base_url.trim_end_matches('/')
            );
            let started = match self
                .provider
                .request_phone_numbers(&pending_apollo_ids, &webhook_url)
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "Phone number queue request failed");
                    false
                }
            };
            response.phone_enrichment = Some(PhoneEnrichmentDto {
                leads_queued: pending_apollo_ids.len(),
                started,
            });
        }

        let transaction = EnrichmentTransaction {
            id: Uuid::new_v4(),
            org_id,
            credits_used,
            companies_processed: response.companies_processed,
            employees_created: response.total_employees_created,
            leads_created: response.total_leads_created,
            cache_hits: response.cache_hits,
            api_fetches: response.apollo_fetches,
            created_at: Utc::now().into(),
        };
        self.transaction_repo.append(&transaction).await?;

        if !skipped.is_empty() {
            response.skipped_companies = Some(skipped);
        }

        info!(
            org_id = %org_id,
            processed = response.companies_processed,
            skipped = response.companies_skipped,
            leads = response.total_leads_created,
            credits = credits_used,
            "Enrichment batch finished"
        );

        Ok(response)
    }

    /// 只读的成本估算预览，不产生任何写入
    pub async fn preview(
        &self,
        org_id: Uuid,
        company_ids: Option<&[Uuid]>,
    ) -> Result<EnrichmentPreviewResponseDto, EnrichmentError> {
        let companies = self.resolve_targets(org_id, company_ids).await?;

        // Missing usage rows are not initialized here: previews stay read-only
        let credits_remaining = match self.credits_repo.get_usage(org_id).await {
            Ok(usage) => usage.remaining(),
            Err(CreditsRepositoryError::CreditsNotFound(_)) => self.options.default_credit_limit,
            Err(e) => return Err(e.into()),
        };

        let mut dto = EnrichmentPreviewResponseDto {
            companies: Vec::with_capacity(companies.len()),
            total_companies: companies.len() as i32,
            companies_with_domain: 0,
            companies_enriched: 0,
            credits_remaining,
        };

        for company in companies {
            let cache_status = match &company.domain {
                Some(domain) => match self.cache_repo.find_by_domain(domain).await? {
                    Some(entry) => CacheStatusDto {
                        exists: true,
                        employees_count: entry.employees.len() as i32,
                        is_stale: entry.is_stale(self.options.cache_ttl_hours),
                        last_fetched_at: Some(entry.fetched_at),
                    },
                    None => CacheStatusDto::default(),
                },
                None => CacheStatusDto::default(),
            };

            if company.domain.is_some() {
                dto.companies_with_domain += 1;
            }
            if company.is_enriched {
                dto.companies_enriched += 1;
            }
            dto.companies.push(CompanyPreviewDto {
                id: company.id,
                name: company.name,
                has_domain: company.domain.is_some(),
                is_enriched: company.is_enriched,
                cache_status,
            });
        }

        Ok(dto)
    }

    /// 处理单个公司；失败只记录在返回的明细中
    #[allow(clippy::too_many_arguments)]
    async fn enrich_one(
        &self,
        org_id: Uuid,
        company: &Company,
        titles: &[String],
        seniorities: &[String],
        fetch_all: bool,
        reveal_phones: bool,
        pending_apollo_ids: &mut Vec<String>,
    ) -> CompanyEnrichmentResultDto {
        let mut result = CompanyEnrichmentResultDto {
            company_id: company.id,
            company_name: company.name.clone(),
            employees_created: 0,
            leads_created: 0,
            cache_hit: false,
            error: None,
        };

        let domain = company.domain.as_deref().unwrap_or_default();
        let fetched = match self
            .gateway
            .fetch_employees(domain, titles, seniorities, fetch_all)
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(company = %company.name, error = %e, "Employee fetch failed");
                result.error = Some(e.to_string());
                return result;
            }
        };
        result.cache_hit = fetched.cache_hit;

        for record in &fetched.records {
            let (employee, created) = match self
                .employee_repo
                .upsert_from_record(org_id, company.id, record)
                .await
            {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(apollo_id = %record.apollo_id, error = %e, "Employee upsert failed, skipping");
                    continue;
                }
            };
            if created {
                result.employees_created += 1;
            }

            let wants_phone = reveal_phones && employee.phone.is_none();
            let mut lead = Lead::new(org_id, company.id, employee.id);
            if wants_phone {
                lead = lead.with_phone_pending();
            }
            match self.lead_repo.insert_skip_conflict(&lead).await {
                Ok(true) => {
                    result.leads_created += 1;
                    if wants_phone {
                        pending_apollo_ids.push(record.apollo_id.clone());
                    }
                }
                // Phone reveal only covers leads created in this batch;
                // a pre-existing lead keeps its metadata untouched
                Ok(false) => {}
                Err(e) => {
                    warn!(employee_id = %employee.id, error = %e, "Lead insert failed, skipping");
                }
            }
        }

        // Marked enriched even when no new employees or leads resulted
        if let Err(e) = self.company_repo.mark_enriched(company.id).await {
            warn!(company_id = %company.id, error = %e, "Failed to mark company enriched");
        }

        result
    }

    async fn resolve_targets(
        &self,
        org_id: Uuid,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<Company>, EnrichmentError> {
        match ids {
            Some(ids) if !ids.is_empty() => {
                Ok(self.company_repo.find_by_ids(org_id, ids).await?)
            }
            _ => {
                // Default scope: every company already referenced by a lead
                let ids: Vec<Uuid> = self
                    .lead_repo
                    .company_ids_for_org(org_id)
                    .await?
                    .into_iter()
                    .collect();
                Ok(self.company_repo.find_by_ids(org_id, &ids).await?)
            }
        }
    }

    async fn ensure_credits(
        &self,
        org_id: Uuid,
    ) -> Result<crate::domain::models::credits::CreditUsage, EnrichmentError> {
        match self.credits_repo.get_usage(org_id).await {
            Ok(usage) => Ok(usage),
            Err(CreditsRepositoryError::CreditsNotFound(_)) => Ok(self
                .credits_repo
                .initialize_org_credits(org_id, self.options.default_credit_limit)
                .await?),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "enrich_companies_test.rs"]
mod tests;
