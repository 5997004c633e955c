// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 充实预览响应数据传输对象
///
/// 只读的成本估算视图，不产生任何写入
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentPreviewResponseDto {
    /// 每个公司的预览明细
    pub companies: Vec<CompanyPreviewDto>,
    /// 公司总数
    pub total_companies: i32,
    /// 拥有域名的公司数量
    pub companies_with_domain: i32,
    /// 已完成充实的公司数量
    pub companies_enriched: i32,
    /// 组织剩余积分
    pub credits_remaining: i64,
}

/// 单个公司的预览明细
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPreviewDto {
    /// 公司ID
    pub id: Uuid,
    /// 公司名称
    pub name: String,
    /// 是否拥有域名
    pub has_domain: bool,
    /// 是否已完成充实
    pub is_enriched: bool,
    /// 员工缓存状态
    pub cache_status: CacheStatusDto,
}

/// 域名对应的员工缓存状态
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatusDto {
    /// 缓存条目是否存在
    pub exists: bool,
    /// 缓存的联系人数量
    pub employees_count: i32,
    /// 缓存是否已过期
    pub is_stale: bool,
    /// 最近一次抓取时间
    pub last_fetched_at: Option<DateTime<FixedOffset>>,
}
