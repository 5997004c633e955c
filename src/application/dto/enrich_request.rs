// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 充实触发请求数据传输对象
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequestDto {
    /// 目标公司ID列表；缺省时取组织内所有已有线索覆盖的公司
    #[validate(length(max = 500, message = "companyIds cannot exceed 500 entries"))]
    pub company_ids: Option<Vec<Uuid>>,
    /// 联系人过滤条件
    pub filters: Option<EnrichmentFiltersDto>,
    /// 是否抓取全部可用联系人
    pub fetch_all: Option<bool>,
    /// 是否请求电话号码（异步经 Webhook 送达）
    pub reveal_phone_numbers: Option<bool>,
}

/// 联系人过滤条件
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentFiltersDto {
    /// 职位头衔过滤
    #[serde(default)]
    pub titles: Vec<String>,
    /// 资历级别过滤
    #[serde(default)]
    pub seniorities: Vec<String>,
}
