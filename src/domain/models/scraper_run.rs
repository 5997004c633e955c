// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 抓取运行实体
///
/// 表示单个抓取配置的一次执行尝试，带有自己的生命周期和计数器。
/// 运行记录在调度时统一以 Queued 状态创建，之后仅由其所属的
/// 执行器或过期清理器变更状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperRun {
    /// 运行唯一标识符
    pub id: Uuid,
    /// 所属搜索ID
    pub search_id: Uuid,
    /// 所属组织ID，用于权限隔离和资源核算
    pub org_id: Uuid,
    /// 抓取配置在搜索中的序号
    pub scraper_index: i32,
    /// 本次运行使用的抓取配置快照
    pub config: serde_json::Value,
    /// 运行状态，跟踪运行在其生命周期中的当前阶段
    pub status: ScraperRunStatus,
    /// 发现的职位数量
    pub jobs_found: i32,
    /// 发现的公司数量（批次内去重后）
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
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 运行状态枚举
///
/// 表示运行在其生命周期中的不同状态。
/// 状态转换遵循以下流程：
/// Queued → Running → Completed/Failed；Queued → Cancelled
///
/// Completed/Failed/Cancelled 为终态，终态记录不再发生转换。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScraperRunStatus {
    /// 已入队，运行记录已创建但执行器尚未开始
    #[default]
    Queued,
    /// 运行中，执行器正在调用外部数据源
    Running,
    /// 已完成，运行成功并记录了计数
    Completed,
    /// 已失败，包括超时与外部调用错误
    Failed,
    /// 已取消，执行器启动前被标记取消
    Cancelled,
}

impl ScraperRunStatus {
    /// 判断状态是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScraperRunStatus::Completed | ScraperRunStatus::Failed | ScraperRunStatus::Cancelled
        )
    }
}

impl fmt::Display for ScraperRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScraperRunStatus::Queued => write!(f, "queued"),
            ScraperRunStatus::Running => write!(f, "running"),
            ScraperRunStatus::Completed => write!(f, "completed"),
            ScraperRunStatus::Failed => write!(f, "failed"),
            ScraperRunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for ScraperRunStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(ScraperRunStatus::Queued),
            "running" => Ok(ScraperRunStatus::Running),
            "completed" => Ok(ScraperRunStatus::Completed),
            "failed" => Ok(ScraperRunStatus::Failed),
            "cancelled" => Ok(ScraperRunStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，当运行状态转换不符合业务规则时发生
    #[error("Invalid state transition")]
    InvalidStateTransition,

    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 运行结束时记录的计数器
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCounters {
    pub jobs_found: i32,
    pub companies_found: i32,
    pub new_companies: i32,
    pub leads_created: i32,
}

impl ScraperRun {
    /// 创建一个新的抓取运行记录
    ///
    /// # 参数
    ///
    /// * `search_id` - 所属搜索ID
    /// * `org_id` - 所属组织ID
    /// * `scraper_index` - 抓取配置序号
    /// * `config` - 抓取配置快照
    ///
    /// # 返回值
    ///
    /// 返回处于 Queued 状态的新运行记录；started_at 取创建时刻，
    /// 这样排队中被遗弃的记录同样会被过期清理器回收
    pub fn new(search_id: Uuid, org_id: Uuid, scraper_index: i32, config: serde_json::Value) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            search_id,
            org_id,
            scraper_index,
            config,
            status: ScraperRunStatus::Queued,
            jobs_found: 0,
            companies_found: 0,
            new_companies: 0,
            leads_created: 0,
            error_message: None,
            duration_ms: None,
            started_at: Some(now),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 启动运行
    ///
    /// 将状态从 Queued 变更为 Running 并刷新开始时间
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            ScraperRunStatus::Queued => {
                self.status = ScraperRunStatus::Running;
                self.started_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 完成运行
    ///
    /// 将状态从 Running 变更为 Completed 并记录计数器
    pub fn complete(mut self, counters: RunCounters, duration_ms: i64) -> Result<Self, DomainError> {
        match self.status {
            ScraperRunStatus::Running => {
                self.status = ScraperRunStatus::Completed;
                self.jobs_found = counters.jobs_found;
                self.companies_found = counters.companies_found;
                self.new_companies = counters.new_companies;
                self.leads_created = counters.leads_created;
                self.duration_ms = Some(duration_ms);
                self.completed_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记运行失败
    ///
    /// 将状态从 Queued/Running 变更为 Failed 并记录错误信息。
    /// Queued 态允许直接失败，覆盖执行器启动前的准备错误。
    pub fn fail(mut self, error: String, duration_ms: Option<i64>) -> Result<Self, DomainError> {
        match self.status {
            ScraperRunStatus::Queued | ScraperRunStatus::Running => {
                self.status = ScraperRunStatus::Failed;
                self.error_message = Some(error);
                self.duration_ms = duration_ms;
                self.completed_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 取消运行
    ///
    /// 仅允许 Queued 态被取消；执行器一旦开始外部调用便不再中断
    pub fn cancel(mut self) -> Result<Self, DomainError> {
        match self.status {
            ScraperRunStatus::Queued => {
                self.status = ScraperRunStatus::Cancelled;
                self.completed_at = Some(Utc::now().into());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn queued_run() -> ScraperRun {
        ScraperRun::new(Uuid::new_v4(), Uuid::new_v4(), 0, json!({"title": "SRE"}))
    }

    #[test]
    fn lifecycle_happy_path() {
        let run = queued_run().start().unwrap();
        assert_eq!(run.status, ScraperRunStatus::Running);

        let counters = RunCounters {
            jobs_found: 12,
            companies_found: 5,
            new_companies: 3,
            leads_created: 4,
        };
        let run = run.complete(counters, 2500).unwrap();
        assert_eq!(run.status, ScraperRunStatus::Completed);
        assert_eq!(run.new_companies, 3);
        assert_eq!(run.duration_ms, Some(2500));
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn cancel_only_from_queued() {
        let run = queued_run().cancel().unwrap();
        assert_eq!(run.status, ScraperRunStatus::Cancelled);
        assert!(run.status.is_terminal());

        let running = queued_run().start().unwrap();
        assert!(running.cancel().is_err());
    }

    #[test]
    fn terminal_states_reject_transitions() {
        let failed = queued_run().fail("boom".to_string(), None).unwrap();
        assert!(failed.clone().start().is_err());
        assert!(failed.fail("again".to_string(), None).is_err());
    }
}
