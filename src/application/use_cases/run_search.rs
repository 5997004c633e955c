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

use crate::application::dto::run_request::RunSearchRequestDto;
use crate::application::dto::run_response::{
    RunSearchResponseDto, ScraperResultDto, ScraperRunDto,
};
use crate::domain::models::credits::{CreditOperation, CreditUsage};
use crate::domain::models::scraper_run::ScraperRun;
use crate::domain::models::search::{ScraperConfig, SearchStatus};
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::credits_repository::{
    CreditsRepository, CreditsRepositoryError,
};
use crate::domain::repositories::scraper_run_repository::ScraperRunRepository;
use crate::domain::repositories::search_repository::SearchRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::scraper_executor::ScraperExecutor;
use crate::domain::services::stale_run_reaper::StaleRunReaper;
use crate::infrastructure::metrics::CREDITS_DEBITED;
use futures::future;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// 运行触发用例错误类型
#[derive(Error, Debug)]
pub enum RunSearchError {
    /// 搜索或抓取配置序号不存在
    #[error("Search not found")]
    NotFound,
    /// 请求参数不符合业务规则
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// 积分已耗尽，启动前置检查失败
    #[error("Insufficient credits: {0} remaining")]
    InsufficientCredits(i64),
    /// 仓库错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// 积分仓库错误
    #[error("Credits error: {0}")]
    Credits(#[from] CreditsRepositoryError),
}

/// 运行触发用例
///
/// 协调一次搜索的完整运行：前置检查、过期清理、运行记录创建、
/// 并发扇出与汇合、总量累加和一次性积分扣减。
/// 所有前置检查失败都发生在任何运行记录创建之前；
/// 扇出之后单个执行器的失败被就地吸收，不会中断汇合。
pub struct RunSearchUseCase {
    search_repo: Arc<dyn SearchRepository>,
    run_repo: Arc<dyn ScraperRunRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    credits_repo: Arc<dyn CreditsRepository>,
    executor: Arc<ScraperExecutor>,
    reaper: Arc<StaleRunReaper>,
    /// 新组织首次运行时的默认积分额度
    default_credit_limit: i64,
}

impl RunSearchUseCase {
    /// 创建新的运行触发用例实例
    pub fn new(
        search_repo: Arc<dyn SearchRepository>,
        run_repo: Arc<dyn ScraperRunRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        credits_repo: Arc<dyn CreditsRepository>,
        executor: Arc<ScraperExecutor>,
        reaper: Arc<StaleRunReaper>,
        default_credit_limit: i64,
    ) -> Self {
        Self {
            search_repo,
            run_repo,
            company_repo,
            credits_repo,
            executor,
            reaper,
            default_credit_limit,
        }
    }

    /// 触发一次搜索运行
    ///
    /// # 参数
    ///
    /// * `org_id` - 请求方组织ID
    /// * `search_id` - 目标搜索ID
    /// * `request` - 运行请求参数
    ///
    /// # 返回值
    ///
    /// 返回整体计数与每个抓取单元的明细
    pub async fn trigger(
        &self,
        org_id: Uuid,
        search_id: Uuid,
        request: &RunSearchRequestDto,
    ) -> Result<RunSearchResponseDto, RunSearchError> {
        let search = self
            .search_repo
            .find_by_id(org_id, search_id)
            .await?
            .ok_or(RunSearchError::NotFound)?;

        if search.scraper_configs.is_empty() {
            return Err(RunSearchError::ValidationError(
                "Search has no scraper configs".to_string(),
            ));
        }

        let targeted: Vec<(i32, ScraperConfig)> = match request.scraper_index {
            Some(index) => {
                let config = usize::try_from(index)
                    .ok()
                    .and_then(|i| search.scraper_configs.get(i).cloned())
                    .ok_or(RunSearchError::NotFound)?;
                vec![(index, config)]
            }
            None => search
                .scraper_configs
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, c)| (i as i32, c))
                .collect(),
        };

        let usage = self.ensure_credits(org_id).await?;
        if usage.is_exhausted() {
            return Err(RunSearchError::InsufficientCredits(usage.remaining()));
        }

        // Recover runs orphaned by a previous crash before starting new ones
        let reaped = self.reaper.reap(search_id).await?;
        if reaped > 0 {
            info!(search_id = %search_id, reaped, "Stale runs failed before new run");
        }

        self.search_repo
            .set_status(search_id, SearchStatus::Running)
            .await?;

        // Every run row is visible as queued before any executor starts
        let mut runs: Vec<ScraperRun> = Vec::with_capacity(targeted.len());
        for (index, config) in &targeted {
            let config_value = serde_json::to_value(config).map_err(|e| {
                RunSearchError::ValidationError(format!("Unserializable scraper config: {e}"))
            })?;
            let run = ScraperRun::new(search_id, org_id, *index, config_value);
            runs.push(self.run_repo.create(&run).await?);
        }

        // One snapshot load; each executor gets a private copy
        let snapshot = self.company_repo.name_index(org_id, search_id).await?;

        let outcomes = future::join_all(
            runs.iter()
                .map(|run| self.executor.execute(run, snapshot.clone())),
        )
        .await;

        let mut total_jobs = 0;
        let mut total_companies = 0;
        let mut total_new_companies = 0;
        let mut total_leads = 0;
        for outcome in outcomes.iter().filter(|o| o.succeeded()) {
            total_jobs += outcome.jobs_found;
            total_companies += outcome.companies_found;
            total_new_companies += outcome.new_companies;
            total_leads += outcome.leads_created;
        }

        self.search_repo
            .record_run_totals(search_id, total_new_companies, total_jobs)
            .await?;

        // Exactly one debit per triggered run, only when net-new companies exist
        if total_new_companies > 0 {
            let balance = self
                .credits_repo
                .debit(
                    org_id,
                    total_new_companies as i64,
                    CreditOperation::SearchRun,
                    format!("Search run: {total_new_companies} new companies"),
                    Some(search_id),
                )
                .await?;
            counter!(CREDITS_DEBITED).increment(total_new_companies as u64);
            debug!(org_id = %org_id, balance_after = balance, "Run credits debited");
        }

        self.search_repo
            .set_status(search_id, SearchStatus::Idle)
            .await?;

        info!(
            search_id = %search_id,
            scrapers = outcomes.len(),
            jobs = total_jobs,
            new_companies = total_new_companies,
            leads = total_leads,
            "Search run finished"
        );

        Ok(RunSearchResponseDto {
            scrapers_run: outcomes.len(),
            total_jobs_found: total_jobs,
            total_companies_found: total_companies,
            total_new_companies,
            total_leads_created: total_leads,
            scraper_results: outcomes.iter().map(ScraperResultDto::from).collect(),
        })
    }

    /// 查询某搜索的运行记录，按创建时间倒序
    pub async fn list_runs(
        &self,
        org_id: Uuid,
        search_id: Uuid,
    ) -> Result<Vec<ScraperRunDto>, RunSearchError> {
        self.search_repo
            .find_by_id(org_id, search_id)
            .await?
            .ok_or(RunSearchError::NotFound)?;

        let runs = self.run_repo.find_by_search(search_id).await?;
        Ok(runs.into_iter().map(Into::into).collect())
    }

    async fn ensure_credits(&self, org_id: Uuid) -> Result<CreditUsage, RunSearchError> {
        match self.credits_repo.get_usage(org_id).await {
            Ok(usage) => Ok(usage),
            Err(CreditsRepositoryError::CreditsNotFound(_)) => Ok(self
                .credits_repo
                .initialize_org_credits(org_id, self.default_credit_limit)
                .await?),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "run_search_test.rs"]
mod tests;
