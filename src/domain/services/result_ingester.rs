// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::company::{normalize_name, Company};
use crate::domain::models::job::Job;
use crate::domain::models::lead::Lead;
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::employee_repository::EmployeeRepository;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::lead_repository::LeadRepository;
use crate::domain::repositories::RepositoryError;
use crate::providers::traits::{ContactEnrichmentProvider, JobPosting};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// 一次批量摄取的结果计数
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOutcome {
    /// 批次中的职位数量
    pub jobs_found: i32,
    /// 批次内按名称去重后的公司数量
    pub companies_found: i32,
    /// 净新增公司数量
    pub new_companies: i32,
    /// 实际创建的线索数量
    pub leads_created: i32,
}

/// 结果摄取服务
///
/// 将外部职位批次写入公司、职位和线索表。
/// 公司去重采用快照加复核模式：调度器在扇出前加载一份
/// (lower(name) -> companyId) 快照，每个执行器持有私有副本；
/// 快照未命中时再复核权威存储，防止兄弟执行器在快照之后已插入。
/// 单条职位或线索的写入错误只记录日志并跳过，不中断整个批次。
pub struct ResultIngester {
    company_repo: Arc<dyn CompanyRepository>,
    job_repo: Arc<dyn JobRepository>,
    employee_repo: Arc<dyn EmployeeRepository>,
    lead_repo: Arc<dyn LeadRepository>,
    enrichment_provider: Arc<dyn ContactEnrichmentProvider>,
}

impl ResultIngester {
    /// 创建新的结果摄取服务实例
    pub fn new(
        company_repo: Arc<dyn CompanyRepository>,
        job_repo: Arc<dyn JobRepository>,
        employee_repo: Arc<dyn EmployeeRepository>,
        lead_repo: Arc<dyn LeadRepository>,
        enrichment_provider: Arc<dyn ContactEnrichmentProvider>,
    ) -> Self {
        Self {
            company_repo,
            job_repo,
            employee_repo,
            lead_repo,
            enrichment_provider,
        }
    }

    /// 摄取一个职位批次
    ///
    /// # 参数
    ///
    /// * `org_id` - 所属组织ID
    /// * `search_id` - 所属搜索ID
    /// * `snapshot` - 扇出时的公司名称快照私有副本
    /// * `postings` - 外部职位批次
    ///
    /// # 返回值
    ///
    /// 返回本批次的计数结果；公司写入的数据库错误会向上传播
    pub async fn ingest(
        &self,
        org_id: Uuid,
        search_id: Uuid,
        mut snapshot: HashMap<String, Uuid>,
        postings: &[JobPosting],
    ) -> Result<IngestOutcome, RepositoryError> {
        let mut outcome = IngestOutcome {
            jobs_found: postings.len() as i32,
            ..Default::default()
        };

        // Distinct companies by normalized name; first occurrence wins
        let mut distinct: Vec<&JobPosting> = Vec::new();
        let mut seen: HashMap<String, ()> = HashMap::new();
        for posting in postings {
            let key = normalize_name(&posting.company_name);
            if key.is_empty() {
                continue;
            }
            if seen.insert(key, ()).is_none() {
                distinct.push(posting);
            }
        }
        outcome.companies_found = distinct.len() as i32;

        for posting in &distinct {
            let key = normalize_name(&posting.company_name);
            if snapshot.contains_key(&key) {
                continue;
            }

            // Re-check the authoritative store: a sibling executor may have
            // inserted this company after the snapshot was taken
            if let Some(existing) = self
                .company_repo
                .find_by_name_ci(org_id, search_id, &key)
                .await?
            {
                snapshot.insert(key, existing.id);
                continue;
            }

            let mut company = Company::new(
                org_id,
                search_id,
                posting.company_name.trim().to_string(),
                posting.company_domain.clone(),
                posting.company_linkedin_url.clone(),
            );

            // Backfill the domain synchronously before responding; the
            // hosting environment may terminate right after the response
            if company.domain.is_none() {
                if let Some(linkedin_url) = &company.linkedin_url {
                    match self.enrichment_provider.enrich_company(linkedin_url).await {
                        Ok(Some(profile)) => company.domain = profile.domain,
                        Ok(None) => {}
                        Err(e) => {
                            warn!(company = %company.name, error = %e, "Company profile enrichment failed");
                        }
                    }
                }
            }

            let inserted = self.company_repo.insert(&company).await?;
            snapshot.insert(key, inserted.id);
            outcome.new_companies += 1;
        }

        // Insert jobs keyed by external id, skip-on-conflict
        for posting in postings {
            let key = normalize_name(&posting.company_name);
            let Some(&company_id) = snapshot.get(&key) else {
                continue;
            };

            let mut job = Job::new(
                org_id,
                company_id,
                posting.external_id.clone(),
                posting.title.clone(),
            );
            job.location = posting.location.clone();
            job.url = posting.url.clone();
            job.posted_at = posting.posted_at;

            if let Err(e) = self.job_repo.insert_skip_conflict(&job).await {
                warn!(external_id = %posting.external_id, error = %e, "Job insert failed, skipping");
            }
        }

        // One lead per distinct poster profile within the batch
        let mut posters_seen: HashMap<String, ()> = HashMap::new();
        for posting in postings {
            let Some(profile_url) = &posting.poster_profile_url else {
                continue;
            };
            if posters_seen.insert(profile_url.clone(), ()).is_some() {
                continue;
            }

            let key = normalize_name(&posting.company_name);
            let Some(&company_id) = snapshot.get(&key) else {
                continue;
            };

            match self
                .employee_repo
                .find_or_create(org_id, company_id, profile_url)
                .await
            {
                Ok((employee, _)) => {
                    let lead = Lead::new(org_id, company_id, employee.id);
                    match self.lead_repo.insert_skip_conflict(&lead).await {
                        Ok(true) => outcome.leads_created += 1,
                        Ok(false) => {}
                        Err(e) => {
                            warn!(profile = %profile_url, error = %e, "Lead insert failed, skipping");
                        }
                    }
                }
                Err(e) => {
                    warn!(profile = %profile_url, error = %e, "Employee lookup failed, skipping lead");
                }
            }
        }

        debug!(
            jobs = outcome.jobs_found,
            companies = outcome.companies_found,
            new_companies = outcome.new_companies,
            leads = outcome.leads_created,
            "Batch ingested"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "result_ingester_test.rs"]
mod tests;
