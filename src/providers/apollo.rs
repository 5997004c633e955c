// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ProviderSettings;
use crate::domain::models::enrichment::ContactRecord;
use crate::providers::traits::{CompanyProfile, ContactEnrichmentProvider, PeopleSearch, ProviderError};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// 全量抓取模式下单个域名的联系人数量上限
const FETCH_ALL_CAP: usize = 500;
/// 全量抓取模式下的单页大小
const FETCH_ALL_PAGE_SIZE: u32 = 100;

/// 联系人充实服务 HTTP 客户端
pub struct ApolloClient {
    base_url: String,
    api_key: String,
    page_size: u32,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ApolloPerson {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    title: Option<String>,
    seniority: Option<String>,
    email: Option<String>,
    email_status: Option<String>,
    #[serde(default)]
    phone_numbers: Vec<ApolloPhone>,
    linkedin_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApolloPhone {
    sanitized_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PeopleSearchResponse {
    #[serde(default)]
    people: Vec<ApolloPerson>,
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total_entries: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct BulkMatchResponse {
    #[serde(default)]
    matches: Vec<Option<ApolloPerson>>,
}

#[derive(Debug, Deserialize)]
struct OrganizationEnrichResponse {
    organization: Option<ApolloOrganization>,
}

#[derive(Debug, Deserialize)]
struct ApolloOrganization {
    primary_domain: Option<String>,
    name: Option<String>,
}

impl From<ApolloPerson> for ContactRecord {
    fn from(person: ApolloPerson) -> Self {
        let phone = person
            .phone_numbers
            .into_iter()
            .find_map(|p| p.sanitized_number);
        Self {
            apollo_id: person.id,
            first_name: person.first_name,
            last_name: person.last_name,
            title: person.title,
            seniority: person.seniority,
            email: person.email,
            email_status: person.email_status,
            phone,
            linkedin_url: person.linkedin_url,
        }
    }
}

impl ApolloClient {
    /// 创建新的联系人充实服务客户端
    pub fn new(settings: &ProviderSettings, page_size: u32) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("Prospectrs/0.1.0"),
        );
        Self {
            base_url: settings.apollo_url.trim_end_matches('/').to_string(),
            api_key: settings.apollo_api_key.clone(),
            page_size,
            client: Client::builder()
                .default_headers(headers)
                .timeout(Duration::from_secs(settings.request_timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&body)
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

        Ok(response.json().await?)
    }

    async fn search_page(
        &self,
        domain: &str,
        titles: &[String],
        seniorities: &[String],
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<ContactRecord>, i32), ProviderError> {
        let body = json!({
            "q_organization_domains": domain,
            "person_titles": titles,
            "person_seniorities": seniorities,
            "page": page,
            "per_page": per_page,
        });

        let parsed: PeopleSearchResponse =
            self.post_json("/v1/mixed_people/search", body).await?;

        let total = parsed
            .pagination
            .and_then(|p| p.total_entries)
            .unwrap_or(parsed.people.len() as i32);
        let people = parsed.people.into_iter().map(Into::into).collect();

        Ok((people, total))
    }
}

#[async_trait]
impl ContactEnrichmentProvider for ApolloClient {
    async fn search_people(
        &self,
        domain: &str,
        titles: &[String],
        seniorities: &[String],
        fetch_all: bool,
    ) -> Result<PeopleSearch, ProviderError> {
        debug!(domain, fetch_all, "Searching contacts");

        if !fetch_all {
            let (people, total) = self
                .search_page(domain, titles, seniorities, 1, self.page_size)
                .await?;
            return Ok(PeopleSearch { people, total });
        }

        let mut people: Vec<ContactRecord> = Vec::new();
        let mut page = 1u32;
        let mut total = 0i32;

        loop {
            let (batch, page_total) = self
                .search_page(domain, titles, seniorities, page, FETCH_ALL_PAGE_SIZE)
                .await?;
            total = page_total;
            let batch_len = batch.len();
            people.extend(batch);

            if batch_len == 0
                || people.len() >= total as usize
                || people.len() >= FETCH_ALL_CAP
            {
                break;
            }
            page += 1;
        }

        people.truncate(FETCH_ALL_CAP);
        Ok(PeopleSearch { people, total })
    }

    async fn bulk_match(
        &self,
        apollo_ids: &[String],
    ) -> Result<Vec<ContactRecord>, ProviderError> {
        if apollo_ids.is_empty() {
            return Ok(Vec::new());
        }

        let details: Vec<serde_json::Value> =
            apollo_ids.iter().map(|id| json!({ "id": id })).collect();
        let body = json!({
            "details": details,
            "reveal_personal_emails": false,
        });

        let parsed: BulkMatchResponse = self.post_json("/v1/people/bulk_match", body).await?;

        Ok(parsed
            .matches
            .into_iter()
            .flatten()
            .map(Into::into)
            .collect())
    }

    async fn enrich_company(
        &self,
        linkedin_url: &str,
    ) -> Result<Option<CompanyProfile>, ProviderError> {
        let url = format!("{}/v1/organizations/enrich", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[("linkedin_url", linkedin_url)])
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
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OrganizationEnrichResponse = response.json().await?;
        Ok(parsed.organization.map(|org| CompanyProfile {
            domain: org.primary_domain,
            name: org.name,
        }))
    }

    async fn request_phone_numbers(
        &self,
        apollo_ids: &[String],
        webhook_url: &str,
    ) -> Result<(), ProviderError> {
        if apollo_ids.is_empty() {
            return Ok(());
        }

        let details: Vec<serde_json::Value> =
            apollo_ids.iter().map(|id| json!({ "id": id })).collect();
        let body = json!({
            "details": details,
            "reveal_phone_number": true,
            "webhook_url": webhook_url,
        });

        let _: serde_json::Value = self.post_json("/v1/people/bulk_match", body).await?;
        Ok(())
    }
}
