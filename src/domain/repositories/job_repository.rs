// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::Job;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 职位仓库特质
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 插入职位记录，外部ID冲突时跳过。
    /// 返回是否实际插入了新行。
    async fn insert_skip_conflict(&self, job: &Job) -> Result<bool, RepositoryError>;
}
