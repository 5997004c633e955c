// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scraper_run::{RunCounters, ScraperRun, ScraperRunStatus};
use crate::domain::models::search::ScraperConfig;
use crate::domain::repositories::scraper_run_repository::ScraperRunRepository;
use crate::domain::services::result_ingester::ResultIngester;
use crate::infrastructure::metrics::{RUNS_COMPLETED, RUNS_FAILED};
use crate::providers::traits::JobSource;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

/// 单个抓取运行的执行结果
///
/// 执行器从不向调度器返回错误：失败被记录在运行记录和
/// 本结构中，绝不影响兄弟执行器或中断汇合点。
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// 抓取配置序号
    pub scraper_index: i32,
    /// 运行记录ID
    pub run_id: Uuid,
    /// 发现的职位数量
    pub jobs_found: i32,
    /// 批次内去重后的公司数量
    pub companies_found: i32,
    /// 净新增公司数量
    pub new_companies: i32,
    /// 创建的线索数量
    pub leads_created: i32,
    /// 失败时的错误信息
    pub error: Option<String>,
    /// 是否在启动前被取消
    pub cancelled: bool,
}

impl RunOutcome {
    fn empty(scraper_index: i32, run_id: Uuid) -> Self {
        Self {
            scraper_index,
            run_id,
            jobs_found: 0,
            companies_found: 0,
            new_companies: 0,
            leads_created: 0,
            error: None,
            cancelled: false,
        }
    }

    /// 执行是否成功完成
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && !self.cancelled
    }
}

/// 抓取执行服务
///
/// 驱动单个运行的状态机：
/// queued →(未取消)→ running → completed，或 running → failed；
/// queued →(已取消)→ 直接终止，不接触外部数据源。
/// 取消检查只在启动时做一次，外部调用一旦开始便不再中断。
pub struct ScraperExecutor {
    run_repo: Arc<dyn ScraperRunRepository>,
    job_source: Arc<dyn JobSource>,
    ingester: Arc<ResultIngester>,
    /// 单次外部调用的硬超时，必须严格小于调度器的整体预算，
    /// 保证并行任务各自获得完整的时间窗口
    task_timeout: Duration,
}

impl ScraperExecutor {
    /// 创建新的抓取执行服务实例
    pub fn new(
        run_repo: Arc<dyn ScraperRunRepository>,
        job_source: Arc<dyn JobSource>,
        ingester: Arc<ResultIngester>,
        task_timeout: Duration,
    ) -> Self {
        Self {
            run_repo,
            job_source,
            ingester,
            task_timeout,
        }
    }

    /// 执行一个运行
    ///
    /// # 参数
    ///
    /// * `run` - 待执行的运行记录（Queued 态）
    /// * `snapshot` - 扇出时的公司名称快照私有副本
    ///
    /// # 返回值
    ///
    /// 总是返回执行结果；所有失败都被就地吸收
    pub async fn execute(
        &self,
        run: &ScraperRun,
        snapshot: HashMap<String, Uuid>,
    ) -> RunOutcome {
        let mut outcome = RunOutcome::empty(run.scraper_index, run.id);

        // Single cooperative cancellation check before touching the source
        match self.run_repo.find_by_id(run.id).await {
            Ok(Some(current)) if current.status == ScraperRunStatus::Cancelled => {
                info!(run_id = %run.id, "Run cancelled before start, skipping");
                outcome.cancelled = true;
                return outcome;
            }
            Ok(_) => {}
            Err(e) => {
                outcome.error = Some(format!("Failed to load run state: {e}"));
                self.record_failure(run.id, outcome.error.as_deref().unwrap_or(""), None)
                    .await;
                return outcome;
            }
        }

        if let Err(e) = self.run_repo.mark_running(run.id).await {
            outcome.error = Some(format!("Failed to mark run as running: {e}"));
            self.record_failure(run.id, outcome.error.as_deref().unwrap_or(""), None)
                .await;
            return outcome;
        }

        let config: ScraperConfig = match serde_json::from_value(run.config.clone()) {
            Ok(config) => config,
            Err(e) => {
                outcome.error = Some(format!("Invalid scraper config: {e}"));
                self.record_failure(run.id, outcome.error.as_deref().unwrap_or(""), Some(0))
                    .await;
                return outcome;
            }
        };

        let started = Instant::now();
        let fetched =
            tokio::time::timeout(self.task_timeout, self.job_source.search_jobs(&config)).await;
        let duration_ms = started.elapsed().as_millis() as i64;

        let postings = match fetched {
            Err(_) => {
                let message = format!(
                    "Scraper timed out after {}s",
                    self.task_timeout.as_secs()
                );
                warn!(run_id = %run.id, scraper_index = run.scraper_index, "{message}");
                outcome.error = Some(message);
                self.record_failure(
                    run.id,
                    outcome.error.as_deref().unwrap_or(""),
                    Some(duration_ms),
                )
                .await;
                return outcome;
            }
            Ok(Err(e)) => {
                warn!(run_id = %run.id, error = %e, "Job source call failed");
                outcome.error = Some(e.to_string());
                self.record_failure(
                    run.id,
                    outcome.error.as_deref().unwrap_or(""),
                    Some(duration_ms),
                )
                .await;
                return outcome;
            }
            Ok(Ok(postings)) => postings,
        };

        match self
            .ingester
            .ingest(run.org_id, run.search_id, snapshot, &postings)
            .await
        {
            Ok(counts) => {
                let counters = RunCounters {
                    jobs_found: counts.jobs_found,
                    companies_found: counts.companies_found,
                    new_companies: counts.new_companies,
                    leads_created: counts.leads_created,
                };
                let duration_ms = started.elapsed().as_millis() as i64;

                if let Err(e) = self
                    .run_repo
                    .mark_completed(run.id, &counters, duration_ms)
                    .await
                {
                    error!(run_id = %run.id, error = %e, "Failed to mark run as completed");
                    outcome.error = Some(format!("Failed to persist completion: {e}"));
                    return outcome;
                }

                counter!(RUNS_COMPLETED).increment(1);
                outcome.jobs_found = counts.jobs_found;
                outcome.companies_found = counts.companies_found;
                outcome.new_companies = counts.new_companies;
                outcome.leads_created = counts.leads_created;
                info!(
                    run_id = %run.id,
                    scraper_index = run.scraper_index,
                    jobs = counts.jobs_found,
                    new_companies = counts.new_companies,
                    duration_ms,
                    "Run completed"
                );
                outcome
            }
            Err(e) => {
                let duration_ms = started.elapsed().as_millis() as i64;
                outcome.error = Some(format!("Result ingestion failed: {e}"));
                self.record_failure(
                    run.id,
                    outcome.error.as_deref().unwrap_or(""),
                    Some(duration_ms),
                )
                .await;
                outcome
            }
        }
    }

    async fn record_failure(&self, run_id: Uuid, message: &str, duration_ms: Option<i64>) {
        counter!(RUNS_FAILED).increment(1);
        if let Err(e) = self.run_repo.mark_failed(run_id, message, duration_ms).await {
            error!(run_id = %run_id, error = %e, "Failed to mark run as failed");
        }
    }
}

#[cfg(test)]
#[path = "scraper_executor_test.rs"]
mod tests;
