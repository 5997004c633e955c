// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 公司实体
///
/// 去重键为 (org_id, search_id, lower(name))，由摄取层通过
/// 快照加复核模式维护，数据库层面不强制唯一。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// 公司唯一标识符
    pub id: Uuid,
    /// 所属组织ID
    pub org_id: Uuid,
    /// 发现该公司的搜索ID
    pub search_id: Uuid,
    /// 公司名称（展示用，大小写保留原样）
    pub name: String,
    /// 公司域名，联系人充实的必要条件
    pub domain: Option<String>,
    /// 公司的外部档案URL
    pub linkedin_url: Option<String>,
    /// 是否已经过联系人充实
    pub is_enriched: bool,
    /// 充实时间
    pub enriched_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl Company {
    /// 创建一个新的公司记录
    pub fn new(
        org_id: Uuid,
        search_id: Uuid,
        name: String,
        domain: Option<String>,
        linkedin_url: Option<String>,
    ) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            org_id,
            search_id,
            name,
            domain,
            linkedin_url,
            is_enriched: false,
            enriched_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 规范化公司名称用于去重比较：小写并去除首尾空白
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
