// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scraper_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub search_id: Uuid,
    pub org_id: Uuid,
    pub scraper_index: i32,
    pub config: Json,
    pub status: String,
    pub jobs_found: i32,
    pub companies_found: i32,
    pub new_companies: i32,
    pub leads_created: i32,
    pub error_message: Option<String>,
    pub duration_ms: Option<i64>,
    pub started_at: Option<ChronoDateTimeWithTimeZone>,
    pub completed_at: Option<ChronoDateTimeWithTimeZone>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::search::Entity",
        from = "Column::SearchId",
        to = "super::search::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Search,
}

impl Related<super::search::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Search.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
