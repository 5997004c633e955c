// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 外部联系人源的电话号码回调载荷
///
/// 电话号码在批处理之外异步送达，载荷结构由外部源定义
#[derive(Debug, Deserialize, Serialize)]
pub struct PhoneWebhookPayload {
    /// 携带电话号码的联系人列表
    #[serde(default)]
    pub people: Vec<PhoneWebhookPerson>,
}

/// 回调中的单个联系人
#[derive(Debug, Deserialize, Serialize)]
pub struct PhoneWebhookPerson {
    /// 外部联系人ID
    pub id: String,
    /// 送达的电话号码列表
    #[serde(default)]
    pub phone_numbers: Vec<PhoneWebhookNumber>,
}

/// 回调中的单个电话号码
#[derive(Debug, Deserialize, Serialize)]
pub struct PhoneWebhookNumber {
    /// 规范化后的号码
    pub sanitized_number: Option<String>,
    /// 原始号码
    pub raw_number: Option<String>,
}

impl PhoneWebhookPerson {
    /// 取第一个可用的号码，规范化形式优先
    pub fn best_number(&self) -> Option<&str> {
        self.phone_numbers.iter().find_map(|n| {
            n.sanitized_number
                .as_deref()
                .or(n.raw_number.as_deref())
                .filter(|s| !s.is_empty())
        })
    }
}

/// 回调处理结果
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneWebhookResponseDto {
    /// 电话号码被升级的员工数量
    pub employees_updated: usize,
    /// 清除待送达标记的线索数量
    pub leads_cleared: u64,
}
