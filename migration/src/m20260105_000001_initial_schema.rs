// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 数据库初始模式迁移
///
/// 创建组织、搜索、抓取运行、公司、职位以及积分相关的基础表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// 应用数据库迁移
    ///
    /// # 参数
    ///
    /// * `manager` - 数据库模式管理器
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 迁移成功
    /// * `Err(DbErr)` - 迁移失败
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Create organizations table (No dependencies)
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .col(
                        ColumnDef::new(Organizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Organizations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Create searches table (Depends on Organizations)
        manager
            .create_table(
                Table::create()
                    .table(Searches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Searches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Searches::OrgId).uuid().not_null())
                    .col(ColumnDef::new(Searches::Name).string().not_null())
                    .col(ColumnDef::new(Searches::ScraperConfigs).json().not_null())
                    .col(ColumnDef::new(Searches::Status).string().not_null())
                    .col(
                        ColumnDef::new(Searches::ResultsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Searches::JobsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Searches::LastRunAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Searches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Searches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Create scraper_runs table (Depends on Searches)
        manager
            .create_table(
                Table::create()
                    .table(ScraperRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScraperRuns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScraperRuns::SearchId).uuid().not_null())
                    .col(ColumnDef::new(ScraperRuns::OrgId).uuid().not_null())
                    .col(
                        ColumnDef::new(ScraperRuns::ScraperIndex)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScraperRuns::Config).json().not_null())
                    .col(ColumnDef::new(ScraperRuns::Status).string().not_null())
                    .col(
                        ColumnDef::new(ScraperRuns::JobsFound)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScraperRuns::CompaniesFound)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScraperRuns::NewCompanies)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScraperRuns::LeadsCreated)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ScraperRuns::ErrorMessage).text())
                    .col(ColumnDef::new(ScraperRuns::DurationMs).big_integer())
                    .col(ColumnDef::new(ScraperRuns::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ScraperRuns::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ScraperRuns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScraperRuns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. Create companies table (Depends on Searches)
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::OrgId).uuid().not_null())
                    .col(ColumnDef::new(Companies::SearchId).uuid().not_null())
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(ColumnDef::new(Companies::Domain).string())
                    .col(ColumnDef::new(Companies::LinkedinUrl).string())
                    .col(
                        ColumnDef::new(Companies::IsEnriched)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Companies::EnrichedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 5. Create jobs table (Depends on Companies)
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::OrgId).uuid().not_null())
                    .col(ColumnDef::new(Jobs::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Jobs::ExternalId).string().not_null())
                    .col(ColumnDef::new(Jobs::Title).string().not_null())
                    .col(ColumnDef::new(Jobs::Location).string())
                    .col(ColumnDef::new(Jobs::Url).string())
                    .col(ColumnDef::new(Jobs::PostedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 6. Create credit_usage table (Depends on Organizations)
        manager
            .create_table(
                Table::create()
                    .table(CreditUsage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditUsage::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditUsage::OrgId).uuid().not_null())
                    .col(
                        ColumnDef::new(CreditUsage::CreditsUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreditUsage::CreditsLimit)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditUsage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CreditUsage::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 7. Create credit_history table (Depends on Organizations)
        manager
            .create_table(
                Table::create()
                    .table(CreditHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditHistory::OrgId).uuid().not_null())
                    .col(
                        ColumnDef::new(CreditHistory::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditHistory::Operation).string().not_null())
                    .col(
                        ColumnDef::new(CreditHistory::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditHistory::ReferenceId).uuid())
                    .col(
                        ColumnDef::new(CreditHistory::BalanceAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    /// 回滚数据库迁移
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditUsage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScraperRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Searches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Searches {
    Table,
    Id,
    OrgId,
    Name,
    ScraperConfigs,
    Status,
    ResultsCount,
    JobsCount,
    LastRunAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScraperRuns {
    Table,
    Id,
    SearchId,
    OrgId,
    ScraperIndex,
    Config,
    Status,
    JobsFound,
    CompaniesFound,
    NewCompanies,
    LeadsCreated,
    ErrorMessage,
    DurationMs,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    OrgId,
    SearchId,
    Name,
    Domain,
    LinkedinUrl,
    IsEnriched,
    EnrichedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    OrgId,
    CompanyId,
    ExternalId,
    Title,
    Location,
    Url,
    PostedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CreditUsage {
    Table,
    Id,
    OrgId,
    CreditsUsed,
    CreditsLimit,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CreditHistory {
    Table,
    Id,
    OrgId,
    Amount,
    Operation,
    Description,
    ReferenceId,
    BalanceAfter,
    CreatedAt,
}
