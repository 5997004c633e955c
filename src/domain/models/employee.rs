// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 员工实体
///
/// 去重键为 (org_id, company_id, apollo_id)。
/// 联系字段只升级（非空覆盖空），从不降级为空。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// 员工唯一标识符
    pub id: Uuid,
    /// 所属组织ID
    pub org_id: Uuid,
    /// 所属公司ID
    pub company_id: Uuid,
    /// 外部联系人ID
    pub apollo_id: String,
    /// 名
    pub first_name: Option<String>,
    /// 姓
    pub last_name: Option<String>,
    /// 职位头衔
    pub title: Option<String>,
    /// 邮箱地址
    pub email: Option<String>,
    /// 电话号码
    pub phone: Option<String>,
    /// 个人档案URL
    pub linkedin_url: Option<String>,
    /// 是否入选候选名单
    pub is_shortlisted: bool,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl Employee {
    /// 创建一个新的员工记录
    pub fn new(org_id: Uuid, company_id: Uuid, apollo_id: String) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            org_id,
            company_id,
            apollo_id,
            first_name: None,
            last_name: None,
            title: None,
            email: None,
            phone: None,
            linkedin_url: None,
            is_shortlisted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
