// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 索引迁移
///
/// 为去重键创建唯一索引，为高频查询路径创建普通索引。
/// 注意：公司表的 (org_id, search_id, lower(name)) 去重键故意不建唯一约束，
/// 并发发现下的重复插入窗口由应用层的快照加复核模式收窄。
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Unique dedup keys
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_external_id")
                    .table(Jobs::Table)
                    .col(Jobs::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_org_company_apollo")
                    .table(Employees::Table)
                    .col(Employees::OrgId)
                    .col(Employees::CompanyId)
                    .col(Employees::ApolloId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_org_employee")
                    .table(Leads::Table)
                    .col(Leads::OrgId)
                    .col(Leads::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_cache_domain")
                    .table(EmployeeCache::Table)
                    .col(EmployeeCache::Domain)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_credit_usage_org")
                    .table(CreditUsage::Table)
                    .col(CreditUsage::OrgId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Query-path indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_companies_org_search")
                    .table(Companies::Table)
                    .col(Companies::OrgId)
                    .col(Companies::SearchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scraper_runs_search")
                    .table(ScraperRuns::Table)
                    .col(ScraperRuns::SearchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_company")
                    .table(Jobs::Table)
                    .col(Jobs::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_org")
                    .table(Leads::Table)
                    .col(Leads::OrgId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_credit_history_org")
                    .table(CreditHistory::Table)
                    .col(CreditHistory::OrgId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_jobs_external_id",
            "idx_employees_org_company_apollo",
            "idx_leads_org_employee",
            "idx_employee_cache_domain",
            "idx_credit_usage_org",
            "idx_companies_org_search",
            "idx_scraper_runs_search",
            "idx_jobs_company",
            "idx_leads_org",
            "idx_credit_history_org",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    ExternalId,
    CompanyId,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    OrgId,
    CompanyId,
    ApolloId,
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    OrgId,
    EmployeeId,
}

#[derive(DeriveIden)]
enum EmployeeCache {
    Table,
    Domain,
}

#[derive(DeriveIden)]
enum CreditUsage {
    Table,
    OrgId,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    OrgId,
    SearchId,
}

#[derive(DeriveIden)]
enum ScraperRuns {
    Table,
    SearchId,
}

#[derive(DeriveIden)]
enum CreditHistory {
    Table,
    OrgId,
}
