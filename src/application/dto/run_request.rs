// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 运行触发请求数据传输对象
///
/// 用于封装客户端触发一次搜索运行的请求参数
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSearchRequestDto {
    /// 仅运行指定序号的抓取配置；缺省时运行全部配置
    pub scraper_index: Option<i32>,
}
