// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 联系人充实相关表迁移
///
/// 创建员工、线索、员工缓存和充实交易审计表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Create employees table (Depends on Companies)
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::OrgId).uuid().not_null())
                    .col(ColumnDef::new(Employees::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Employees::ApolloId).string().not_null())
                    .col(ColumnDef::new(Employees::FirstName).string())
                    .col(ColumnDef::new(Employees::LastName).string())
                    .col(ColumnDef::new(Employees::Title).string())
                    .col(ColumnDef::new(Employees::Email).string())
                    .col(ColumnDef::new(Employees::Phone).string())
                    .col(ColumnDef::new(Employees::LinkedinUrl).string())
                    .col(
                        ColumnDef::new(Employees::IsShortlisted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Create leads table (Depends on Employees)
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leads::OrgId).uuid().not_null())
                    .col(ColumnDef::new(Leads::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Leads::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Leads::Status).string().not_null())
                    .col(ColumnDef::new(Leads::Metadata).json().not_null())
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Leads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Create employee_cache table (domain-keyed, org independent)
        manager
            .create_table(
                Table::create()
                    .table(EmployeeCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeCache::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeCache::Domain).string().not_null())
                    .col(ColumnDef::new(EmployeeCache::Employees).json().not_null())
                    .col(
                        ColumnDef::new(EmployeeCache::TotalAvailable)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeeCache::FetchedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeCache::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EmployeeCache::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. Create enrichment_transactions table (batch audit trail)
        manager
            .create_table(
                Table::create()
                    .table(EnrichmentTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrichmentTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::OrgId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::CreditsUsed)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::CompaniesProcessed)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::EmployeesCreated)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::LeadsCreated)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::CacheHits)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::ApiFetches)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrichmentTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(EnrichmentTransactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(EmployeeCache::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    OrgId,
    CompanyId,
    ApolloId,
    FirstName,
    LastName,
    Title,
    Email,
    Phone,
    LinkedinUrl,
    IsShortlisted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    OrgId,
    CompanyId,
    EmployeeId,
    Status,
    Metadata,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmployeeCache {
    Table,
    Id,
    Domain,
    Employees,
    TotalAvailable,
    FetchedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EnrichmentTransactions {
    Table,
    Id,
    OrgId,
    CreditsUsed,
    CompaniesProcessed,
    EmployeesCreated,
    LeadsCreated,
    CacheHits,
    ApiFetches,
    CreatedAt,
}
