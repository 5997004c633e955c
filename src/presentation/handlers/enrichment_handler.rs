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
    extract::{Extension, Json, Query},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::enrich_request::EnrichmentRequestDto;
use crate::application::use_cases::enrich_companies::EnrichCompaniesUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::org_id::OrgId;

/// 预览查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    /// 逗号分隔的公司ID列表；缺省时取已有线索覆盖的公司
    pub company_ids: Option<String>,
}

/// 触发一个充实批次
pub async fn enrich(
    Extension(use_case): Extension<Arc<EnrichCompaniesUseCase>>,
    OrgId(org_id): OrgId,
    payload: Option<Json<EnrichmentRequestDto>>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    request.validate()?;
    info!(
        org_id = %org_id,
        companies = request.company_ids.as_ref().map(Vec::len),
        "Enrichment batch received"
    );

    let response = use_case.enrich(org_id, &request).await?;
    Ok(Json(response))
}

/// 只读的充实成本预览
pub async fn preview(
    Extension(use_case): Extension<Arc<EnrichCompaniesUseCase>>,
    OrgId(org_id): OrgId,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let company_ids = parse_company_ids(query.company_ids.as_deref())?;
    let response = use_case.preview(org_id, company_ids.as_deref()).await?;
    Ok(Json(response))
}

fn parse_company_ids(raw: Option<&str>) -> Result<Option<Vec<Uuid>>, AppError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = Uuid::parse_str(part)
            .map_err(|_| anyhow::anyhow!("invalid company id in companyIds: {part}"))?;
        ids.push(id);
    }
    Ok(Some(ids))
}
