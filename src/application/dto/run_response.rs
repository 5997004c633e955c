// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scraper_run::ScraperRun;
use crate::domain::services::scraper_executor::RunOutcome;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 运行触发响应数据传输对象
///
/// 汇总一次并发扇出的整体结果与每个抓取单元的明细
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSearchResponseDto {
    /// 本次启动的抓取单元数量
    pub scrapers_run: usize,
    /// 成功单元发现的职位总数
    pub total_jobs_found: i32,
    /// 成功单元去重后的公司总数
    pub total_companies_found: i32,
    /// 成功单元净新增公司总数
    pub total_new_companies: i32,
    /// 成功单元创建的线索总数
    pub total_leads_created: i32,
    /// 每个抓取单元的明细
    pub scraper_results: Vec<ScraperResultDto>,
}

/// 单个抓取单元的执行明细
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperResultDto {
    /// 抓取配置序号
    pub scraper_index: i32,
    /// 运行记录ID
    pub scraper_run_id: Uuid,
    /// 发现的职位数量
    pub jobs_found: i32,
    /// 净新增公司数量
    pub new_companies: i32,
    /// 创建的线索数量
    pub leads_created: i32,
    /// 失败时的错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 是否在启动前被取消
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
}

impl From<&RunOutcome> for ScraperResultDto {
    fn from(outcome: &RunOutcome) -> Self {
        Self {
            scraper_index: outcome.scraper_index,
            scraper_run_id: outcome.run_id,
            jobs_found: outcome.jobs_found,
            new_companies: outcome.new_companies,
            leads_created: outcome.leads_created,
            error: outcome.error.clone(),
            cancelled: outcome.cancelled.then_some(true),
        }
    }
}

/// 运行记录查询响应数据传输对象
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperRunDto {
    /// 运行记录ID
    pub id: Uuid,
    /// 抓取配置序号
    pub scraper_index: i32,
    /// 运行状态
    pub status: String,
    /// 发现的职位数量
    pub jobs_found: i32,
    /// 去重后的公司数量
    pub companies_found: i32,
    /// 净新增公司数量
    pub new_companies: i32,
    /// 创建的线索数量
    pub leads_created: i32,
    /// 失败时的错误信息
    pub error_message: Option<String>,
    /// 执行耗时（毫秒）
    pub duration_ms: Option<i64>,
    /// 开始时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
}

impl From<ScraperRun> for ScraperRunDto {
    fn from(run: ScraperRun) -> Self {
        Self {
            id: run.id,
            scraper_index: run.scraper_index,
            status: run.status.to_string(),
            jobs_found: run.jobs_found,
            companies_found: run.companies_found,
            new_companies: run.new_companies,
            leads_created: run.leads_created,
            error_message: run.error_message,
            duration_ms: run.duration_ms,
            started_at: run.started_at,
            completed_at: run.completed_at,
        }
    }
}
