// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::enrichment::ContactRecord;
use crate::domain::models::search::ScraperConfig;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 外部数据源错误类型
#[derive(Error, Debug)]
pub enum ProviderError {
    /// 请求超时
    #[error("Provider request timed out")]
    Timeout,
    /// 请求失败
    #[error("Provider request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 外部服务返回错误
    #[error("Provider API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// 职位数据源返回的单条职位
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// 外部数据源的职位ID
    pub external_id: String,
    /// 职位名称
    pub title: String,
    /// 公司名称
    pub company_name: String,
    /// 公司域名
    pub company_domain: Option<String>,
    /// 公司档案URL
    pub company_linkedin_url: Option<String>,
    /// 工作地点
    pub location: Option<String>,
    /// 职位发布页URL
    pub url: Option<String>,
    /// 发布者个人档案URL，用于线索归因
    pub poster_profile_url: Option<String>,
    /// 发布时间
    pub posted_at: Option<DateTime<FixedOffset>>,
}

/// 职位数据源特质
///
/// 每个抓取配置对应一次独立查询
#[async_trait]
pub trait JobSource: Send + Sync {
    /// 按配置检索职位
    async fn search_jobs(&self, config: &ScraperConfig) -> Result<Vec<JobPosting>, ProviderError>;
}

/// 联系人检索结果
#[derive(Debug, Clone, Default)]
pub struct PeopleSearch {
    /// 检索到的联系人记录
    pub people: Vec<ContactRecord>,
    /// 外部源报告的总可用人数
    pub total: i32,
}

/// 公司档案充实结果
#[derive(Debug, Clone, Default)]
pub struct CompanyProfile {
    /// 公司域名
    pub domain: Option<String>,
    /// 规范化的公司名称
    pub name: Option<String>,
}

/// 联系人充实服务特质
#[async_trait]
pub trait ContactEnrichmentProvider: Send + Sync {
    /// 按公司域名检索联系人
    async fn search_people(
        &self,
        domain: &str,
        titles: &[String],
        seniorities: &[String],
        fetch_all: bool,
    ) -> Result<PeopleSearch, ProviderError>;

    /// 批量匹配联系人ID以解锁邮箱
    async fn bulk_match(&self, apollo_ids: &[String])
        -> Result<Vec<ContactRecord>, ProviderError>;

    /// 按公司档案URL充实公司信息（主要用于补全域名）
    async fn enrich_company(&self, linkedin_url: &str)
        -> Result<Option<CompanyProfile>, ProviderError>;

    /// 请求异步电话号码揭示，结果通过 Webhook 回调送达
    async fn request_phone_numbers(
        &self,
        apollo_ids: &[String],
        webhook_url: &str,
    ) -> Result<(), ProviderError>;
}
