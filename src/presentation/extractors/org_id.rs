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

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

static HEADER_NAME: &str = "x-org-id";

/// 请求方组织ID，从 X-Org-Id 请求头提取
#[derive(Debug, Clone, Copy)]
pub struct OrgId(pub Uuid);

impl<S> FromRequestParts<S> for OrgId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let org_id = parts
            .headers
            .get(HEADER_NAME)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());

        match org_id {
            Some(org_id) => Ok(OrgId(org_id)),
            None => {
                let body = Json(json!({ "error": "Missing or invalid X-Org-Id header" }));
                Err((StatusCode::BAD_REQUEST, body).into_response())
            }
        }
    }
}
