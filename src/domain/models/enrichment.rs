// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 外部联系人记录
///
/// 联系人检索与批量匹配共用的中间表示。
/// 邮箱合并规则：批量匹配结果优先，缓存值次之，缺失则保持为空，
/// 已有非空值绝不被空值覆盖。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRecord {
    /// 外部联系人ID
    pub apollo_id: String,
    /// 名
    pub first_name: Option<String>,
    /// 姓
    pub last_name: Option<String>,
    /// 职位头衔
    pub title: Option<String>,
    /// 资历级别
    pub seniority: Option<String>,
    /// 邮箱地址
    pub email: Option<String>,
    /// 邮箱验证状态
    pub email_status: Option<String>,
    /// 电话号码
    pub phone: Option<String>,
    /// 个人档案URL
    pub linkedin_url: Option<String>,
}

impl ContactRecord {
    /// 邮箱是否已知且可用（被外部源遮蔽的占位值视为未知）
    pub fn has_usable_email(&self) -> bool {
        match self.email.as_deref() {
            Some(e) => !e.is_empty() && !e.contains("email_not_unlocked"),
            None => false,
        }
    }
}

/// 按域名缓存的联系人集合
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCacheEntry {
    /// 缓存条目ID
    pub id: Uuid,
    /// 公司域名（缓存键，全组织共享）
    pub domain: String,
    /// 缓存的联系人记录
    pub employees: Vec<ContactRecord>,
    /// 外部源报告的总可用人数
    pub total_available: i32,
    /// 抓取时间
    pub fetched_at: DateTime<FixedOffset>,
}

impl EmployeeCacheEntry {
    /// 缓存是否已过期
    pub fn is_stale(&self, ttl_hours: i64) -> bool {
        let now: DateTime<FixedOffset> = Utc::now().into();
        now - self.fetched_at > Duration::hours(ttl_hours)
    }
}

/// 一次充实批处理的审计记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentTransaction {
    pub id: Uuid,
    pub org_id: Uuid,
    pub credits_used: i64,
    pub companies_processed: i32,
    pub employees_created: i32,
    pub leads_created: i32,
    pub cache_hits: i32,
    pub api_fetches: i32,
    pub created_at: DateTime<FixedOffset>,
}
