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
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dto::phone_webhook::PhoneWebhookPayload;
use crate::application::use_cases::phone_webhook::PhoneWebhookUseCase;
use crate::config::settings::Settings;
use crate::presentation::errors::AppError;

static SIGNATURE_HEADER: &str = "x-apollo-signature";

/// 接收外部联系人源的电话号码回调
///
/// 先用共享密钥校验载荷签名，再升级员工电话并清除线索标记。
/// 签名校验失败一律返回401，不泄露失败原因。
pub async fn apollo_webhook(
    Extension(use_case): Extension<Arc<PhoneWebhookUseCase>>,
    Extension(settings): Extension<Arc<Settings>>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    if !verify_signature(&headers, settings.webhook.secret.as_bytes(), body.as_bytes()) {
        warn!("Webhook signature verification failed");
        let body = Json(json!({ "error": "Invalid webhook signature" }));
        return Ok((StatusCode::UNAUTHORIZED, body).into_response());
    }

    let payload: PhoneWebhookPayload = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Webhook payload failed to parse");
            let body = Json(json!({ "error": "Malformed webhook payload" }));
            return Ok((StatusCode::BAD_REQUEST, body).into_response());
        }
    };

    info!(people = payload.people.len(), "Phone webhook received");
    let response = use_case.handle(&payload).await?;
    Ok(Json(response).into_response())
}

fn verify_signature(headers: &HeaderMap, secret: &[u8], body: &[u8]) -> bool {
    let Some(signature_hex) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    type HmacSha256 = Hmac<Sha256>;
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn sign(secret: &[u8], body: &[u8]) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_is_accepted() {
        let secret = b"shared-secret";
        let body = br#"{"people":[]}"#;
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(secret, body)).unwrap(),
        );

        assert!(verify_signature(&headers, secret, body));
    }

    #[test]
    fn wrong_secret_or_missing_header_is_rejected() {
        let body = br#"{"people":[]}"#;
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(b"other-secret", body)).unwrap(),
        );

        assert!(!verify_signature(&headers, b"shared-secret", body));
        assert!(!verify_signature(&HeaderMap::new(), b"shared-secret", body));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let secret = b"shared-secret";
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(secret, br#"{"people":[]}"#)).unwrap(),
        );

        assert!(!verify_signature(&headers, secret, br#"{"people":[{}]}"#));
    }
}
