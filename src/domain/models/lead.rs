// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 线索实体
///
/// 每个员工在一个组织内至多一条线索，写入采用冲突跳过。
/// metadata 中的 phone_pending 标记表示电话号码待异步送达。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// 线索唯一标识符
    pub id: Uuid,
    /// 所属组织ID
    pub org_id: Uuid,
    /// 所属公司ID
    pub company_id: Uuid,
    /// 关联员工ID
    pub employee_id: Uuid,
    /// 线索状态
    pub status: LeadStatus,
    /// 附加元数据
    pub metadata: serde_json::Value,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 线索状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// 新建
    #[default]
    New,
    /// 已联系
    Contacted,
    /// 已确认意向
    Qualified,
    /// 已拒绝
    Rejected,
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeadStatus::New => write!(f, "new"),
            LeadStatus::Contacted => write!(f, "contacted"),
            LeadStatus::Qualified => write!(f, "qualified"),
            LeadStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for LeadStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "rejected" => Ok(LeadStatus::Rejected),
            _ => Err(()),
        }
    }
}

impl Lead {
    /// 创建一个新的线索
    pub fn new(org_id: Uuid, company_id: Uuid, employee_id: Uuid) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            org_id,
            company_id,
            employee_id,
            status: LeadStatus::New,
            metadata: json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    /// 标记电话号码待异步送达
    pub fn with_phone_pending(mut self) -> Self {
        self.metadata["phone_pending"] = json!(true);
        self
    }

    /// 电话号码是否待送达
    pub fn phone_pending(&self) -> bool {
        self.metadata
            .get("phone_pending")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
