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
    extract::{Extension, Json},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::dto::credits_response::CreditsResponseDto;
use crate::config::settings::Settings;
use crate::domain::repositories::credits_repository::{
    CreditsRepository, CreditsRepositoryError,
};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::org_id::OrgId;

const HISTORY_LIMIT: u32 = 20;

/// 查询组织的积分概览
///
/// 尚未产生任何消耗的组织返回默认额度的只读视图，
/// 不在读取路径上创建用量行
pub async fn get_credits(
    Extension(credits_repo): Extension<Arc<dyn CreditsRepository>>,
    Extension(settings): Extension<Arc<Settings>>,
    OrgId(org_id): OrgId,
) -> Result<impl IntoResponse, AppError> {
    let response = match credits_repo.get_usage(org_id).await {
        Ok(usage) => {
            let history = credits_repo.history(org_id, Some(HISTORY_LIMIT)).await?;
            CreditsResponseDto::from_usage(&usage, history)
        }
        Err(CreditsRepositoryError::CreditsNotFound(_)) => CreditsResponseDto {
            credits_used: 0,
            credits_limit: settings.credits.default_limit,
            credits_remaining: settings.credits.default_limit,
            history: Vec::new(),
        },
        Err(e) => return Err(e.into()),
    };

    Ok(Json(response))
}
