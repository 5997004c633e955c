// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::use_cases::enrich_companies::EnrichmentError;
use crate::application::use_cases::run_search::RunSearchError;
use crate::domain::repositories::credits_repository::CreditsRepositoryError;
use crate::domain::repositories::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if let Some(e) = self.0.downcast_ref::<RunSearchError>() {
            match e {
                RunSearchError::NotFound => StatusCode::NOT_FOUND,
                RunSearchError::ValidationError(_) => StatusCode::BAD_REQUEST,
                RunSearchError::InsufficientCredits(_) => StatusCode::PAYMENT_REQUIRED,
                RunSearchError::Repository(_) | RunSearchError::Credits(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else if let Some(e) = self.0.downcast_ref::<EnrichmentError>() {
            match e {
                EnrichmentError::InsufficientCredits(_) => StatusCode::PAYMENT_REQUIRED,
                EnrichmentError::Repository(_) | EnrichmentError::Credits(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else if let Some(e) = self.0.downcast_ref::<RepositoryError>() {
            match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(e) = self.0.downcast_ref::<CreditsRepositoryError>() {
            match e {
                CreditsRepositoryError::CreditsNotFound(_) => StatusCode::NOT_FOUND,
                CreditsRepositoryError::InsufficientCredits { .. } => {
                    StatusCode::PAYMENT_REQUIRED
                }
                CreditsRepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if error_message.contains("validation")
            || error_message.contains("invalid")
            || error_message.contains("cannot exceed")
        {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
