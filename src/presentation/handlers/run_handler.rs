// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Extension, Json, Path},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::application::dto::run_request::RunSearchRequestDto;
use crate::application::use_cases::run_search::RunSearchUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::org_id::OrgId;

/// 触发一次搜索运行
pub async fn trigger_run(
    Extension(use_case): Extension<Arc<RunSearchUseCase>>,
    OrgId(org_id): OrgId,
    Path(search_id): Path<Uuid>,
    payload: Option<Json<RunSearchRequestDto>>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    info!(org_id = %org_id, search_id = %search_id, scraper_index = ?request.scraper_index, "Run trigger received");

    let response = use_case.trigger(org_id, search_id, &request).await?;
    Ok(Json(response))
}

/// 查询某搜索的运行记录
pub async fn list_runs(
    Extension(use_case): Extension<Arc<RunSearchUseCase>>,
    OrgId(org_id): OrgId,
    Path(search_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let runs = use_case.list_runs(org_id, search_id).await?;
    Ok(Json(runs))
}
