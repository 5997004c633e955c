// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 职位实体
///
/// 去重键为外部ID，写入采用冲突跳过
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// 职位唯一标识符
    pub id: Uuid,
    /// 所属组织ID
    pub org_id: Uuid,
    /// 所属公司ID
    pub company_id: Uuid,
    /// 外部数据源的职位ID
    pub external_id: String,
    /// 职位名称
    pub title: String,
    /// 工作地点
    pub location: Option<String>,
    /// 职位发布页URL
    pub url: Option<String>,
    /// 发布时间
    pub posted_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

impl Job {
    /// 创建一个新的职位记录
    pub fn new(org_id: Uuid, company_id: Uuid, external_id: String, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            company_id,
            external_id,
            title,
            location: None,
            url: None,
            posted_at: None,
            created_at: Utc::now().into(),
        }
    }
}
