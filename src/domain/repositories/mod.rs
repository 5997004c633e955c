// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 搜索仓库（search_repository）：管理搜索配置与累计统计
/// - 抓取运行仓库（scraper_run_repository）：管理抓取运行的生命周期
/// - 公司仓库（company_repository）：管理公司记录与去重快照
/// - 职位仓库（job_repository）：管理职位记录的冲突跳过写入
/// - 员工仓库（employee_repository）：管理联系人记录的创建与升级
/// - 线索仓库（lead_repository）：管理线索记录
/// - 积分仓库（credits_repository）：管理组织的积分余额和流水
/// - 员工缓存仓库（employee_cache_repository）：管理按域名的联系人缓存
/// - 充实事务仓库（enrichment_transaction_repository）：管理批处理审计记录
///
/// 这些接口确保了领域层不依赖于具体的数据存储技术，
/// 提高了系统的可测试性和可维护性.
pub mod company_repository;
pub mod credits_repository;
pub mod employee_cache_repository;
pub mod employee_repository;
pub mod enrichment_transaction_repository;
pub mod job_repository;
pub mod lead_repository;
pub mod scraper_run_repository;
pub mod search_repository;

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 无效的状态转换
    #[error("Invalid state transition")]
    InvalidState,
}
