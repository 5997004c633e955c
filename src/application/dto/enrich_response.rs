// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 充实触发响应数据传输对象
///
/// 汇总一个批次的整体计数、每个公司的明细和被跳过的公司
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResponseDto {
    /// 实际处理的公司数量
    pub companies_processed: i32,
    /// 因缺少域名被跳过的公司数量
    pub companies_skipped: i32,
    /// 新建的员工总数
    pub total_employees_created: i32,
    /// 新建的线索总数
    pub total_leads_created: i32,
    /// 本批次消耗的积分总数
    pub total_credits_used: i64,
    /// 缓存命中次数
    pub cache_hits: i32,
    /// 外部检索次数
    pub apollo_fetches: i32,
    /// 电话号码异步送达的排队情况
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_enrichment: Option<PhoneEnrichmentDto>,
    /// 每个公司的处理明细
    pub results: Vec<CompanyEnrichmentResultDto>,
    /// 被跳过的公司及原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_companies: Option<Vec<SkippedCompanyDto>>,
}

/// 单个公司的充实明细
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyEnrichmentResultDto {
    /// 公司ID
    pub company_id: Uuid,
    /// 公司名称
    pub company_name: String,
    /// 新建的员工数量
    pub employees_created: i32,
    /// 新建的线索数量
    pub leads_created: i32,
    /// 是否命中缓存
    pub cache_hit: bool,
    /// 失败时的错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 电话号码异步送达排队情况
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneEnrichmentDto {
    /// 等待电话送达的线索数量
    pub leads_queued: usize,
    /// 外部排队请求是否成功发出
    pub started: bool,
}

/// 被跳过的公司
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCompanyDto {
    /// 公司ID
    pub id: Uuid,
    /// 公司名称
    pub name: String,
    /// 跳过原因
    pub reason: String,
}
