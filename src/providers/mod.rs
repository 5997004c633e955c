// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 外部数据源模块
///
/// 封装职位数据源与联系人充实服务的 HTTP 客户端。
/// 领域服务只依赖本模块定义的特质，便于在测试中替换。
pub mod apollo;
pub mod job_source;
pub mod traits;
