// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "searches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub scraper_configs: Json,
    pub status: String,
    pub results_count: i32,
    pub jobs_count: i32,
    pub last_run_at: Option<ChronoDateTimeWithTimeZone>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scraper_run::Entity")]
    ScraperRuns,
}

impl Related<super::scraper_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScraperRuns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
