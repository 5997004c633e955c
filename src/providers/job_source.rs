// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ProviderSettings;
use crate::domain::models::search::ScraperConfig;
use crate::providers::traits::{JobPosting, JobSource, ProviderError};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 职位数据源 HTTP 客户端
pub struct HttpJobSource {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct JobSearchResponse {
    jobs: Vec<JobPosting>,
}

impl HttpJobSource {
    /// 创建新的职位数据源客户端
    pub fn new(settings: &ProviderSettings) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("Prospectrs/0.1.0"),
        );
        Self {
            base_url: settings.job_source_url.trim_end_matches('/').to_string(),
            api_key: settings.job_source_api_key.clone(),
            client: Client::builder()
                .default_headers(headers)
                .timeout(Duration::from_secs(settings.request_timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn search_jobs(&self, config: &ScraperConfig) -> Result<Vec<JobPosting>, ProviderError> {
        let url = format!("{}/v1/jobs/search", self.base_url);

        let mut query = vec![
            ("title", config.title.clone()),
            ("location", config.location.clone()),
        ];
        if let Some(level) = &config.experience_level {
            query.push(("experience_level", level.clone()));
        }

        debug!(title = %config.title, location = %config.location, "Searching job source");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::RequestFailed(e)
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: JobSearchResponse = response.json().await?;
        Ok(body.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> ProviderSettings {
        ProviderSettings {
            job_source_url: server.uri(),
            job_source_api_key: "test-key".to_string(),
            apollo_url: server.uri(),
            apollo_api_key: "test-key".to_string(),
            request_timeout_secs: 5,
        }
    }

    fn config() -> ScraperConfig {
        ScraperConfig {
            title: "Site Reliability Engineer".to_string(),
            location: "Berlin".to_string(),
            experience_level: None,
        }
    }

    #[tokio::test]
    async fn parses_job_search_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/jobs/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jobs": [{
                    "external_id": "job-1",
                    "title": "SRE",
                    "company_name": "Acme",
                    "company_domain": "acme.com",
                    "company_linkedin_url": null,
                    "location": "Berlin",
                    "url": "https://jobs.example/1",
                    "poster_profile_url": "https://profiles.example/jane",
                    "posted_at": null
                }]
            })))
            .mount(&server)
            .await;

        let source = HttpJobSource::new(&settings_for(&server));
        let jobs = source.search_jobs(&config()).await.unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].external_id, "job-1");
        assert_eq!(jobs[0].company_name, "Acme");
    }

    #[tokio::test]
    async fn surfaces_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/jobs/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let source = HttpJobSource::new(&settings_for(&server));
        let err = source.search_jobs(&config()).await.unwrap_err();

        match err {
            ProviderError::Api { status, .. } => assert_eq!(status, 429),
            other => panic!("unexpected error: {other}"),
        }
    }
}
