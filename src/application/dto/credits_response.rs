// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::credits::{CreditHistory, CreditUsage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 积分概览响应数据传输对象
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponseDto {
    /// 已消耗积分
    pub credits_used: i64,
    /// 积分额度
    pub credits_limit: i64,
    /// 剩余积分
    pub credits_remaining: i64,
    /// 最近的消耗记录，按时间倒序
    pub history: Vec<CreditHistoryDto>,
}

/// 单条积分消耗记录
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditHistoryDto {
    /// 记录ID
    pub id: Uuid,
    /// 消耗数量
    pub amount: i64,
    /// 操作类型
    pub operation: String,
    /// 操作描述
    pub description: String,
    /// 关联对象ID
    pub reference_id: Option<Uuid>,
    /// 消耗后的余额
    pub balance_after: i64,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl CreditsResponseDto {
    /// 由用量行和历史记录组装概览
    pub fn from_usage(usage: &CreditUsage, history: Vec<CreditHistory>) -> Self {
        Self {
            credits_used: usage.credits_used,
            credits_limit: usage.credits_limit,
            credits_remaining: usage.remaining(),
            history: history.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreditHistory> for CreditHistoryDto {
    fn from(entry: CreditHistory) -> Self {
        Self {
            id: entry.id,
            amount: entry.amount,
            operation: entry.operation.to_string(),
            description: entry.description,
            reference_id: entry.reference_id,
            balance_after: entry.balance_after,
            created_at: entry.created_at,
        }
    }
}
