// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 搜索实体
///
/// 一个逻辑搜索持有多个独立配置的抓取单元。
/// 触发运行时每个配置各产生一条抓取运行记录并发执行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Search {
    /// 搜索唯一标识符
    pub id: Uuid,
    /// 所属组织ID
    pub org_id: Uuid,
    /// 搜索名称
    pub name: String,
    /// 抓取配置列表
    pub scraper_configs: Vec<ScraperConfig>,
    /// 搜索状态，仅作为可观测性元数据，不参与加锁
    pub status: SearchStatus,
    /// 累计净新增公司数量
    pub results_count: i32,
    /// 累计职位数量
    pub jobs_count: i32,
    /// 最近一次运行时间
    pub last_run_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 抓取配置
///
/// 一个独立执行的搜索单元：职位名称、地点和经验级别
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    /// 职位名称关键词
    pub title: String,
    /// 地点关键词
    pub location: String,
    /// 经验级别（可选）
    pub experience_level: Option<String>,
}

/// 搜索状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// 空闲，没有进行中的运行
    #[default]
    Idle,
    /// 运行中，存在进行中的抓取运行
    Running,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchStatus::Idle => write!(f, "idle"),
            SearchStatus::Running => write!(f, "running"),
        }
    }
}

impl FromStr for SearchStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(SearchStatus::Idle),
            "running" => Ok(SearchStatus::Running),
            _ => Err(()),
        }
    }
}
