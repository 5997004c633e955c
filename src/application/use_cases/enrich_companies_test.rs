#[cfg(test)]
mod tests {
    use crate::application::dto::enrich_request::{EnrichmentFiltersDto, EnrichmentRequestDto};
    use crate::application::use_cases::enrich_companies::{
        EnrichCompaniesUseCase, EnrichmentOptions,
    };
    use crate::domain::models::company::Company;
    use crate::domain::models::credits::CreditOperation;
    use crate::domain::models::enrichment::ContactRecord;
    use crate::domain::repositories::company_repository::CompanyRepository;
    use crate::domain::repositories::credits_repository::{
        CreditsRepository, CreditsRepositoryError,
    };
    use crate::domain::repositories::employee_cache_repository::EmployeeCacheRepository;
    use crate::domain::repositories::enrichment_transaction_repository::EnrichmentTransactionRepository;
    use crate::domain::services::enrichment_cache::EnrichmentCacheGateway;
    use crate::infrastructure::database::entities::lead as lead_entity;
    use crate::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
    use crate::infrastructure::repositories::credits_repo_impl::CreditsRepositoryImpl;
    use crate::infrastructure::repositories::employee_cache_repo_impl::EmployeeCacheRepositoryImpl;
    use crate::infrastructure::repositories::employee_repo_impl::EmployeeRepositoryImpl;
    use crate::infrastructure::repositories::enrichment_transaction_repo_impl::EnrichmentTransactionRepositoryImpl;
    use crate::infrastructure::repositories::lead_repo_impl::LeadRepositoryImpl;
    use crate::providers::traits::{
        CompanyProfile, ContactEnrichmentProvider, PeopleSearch, ProviderError,
    };
    use async_trait::async_trait;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    struct StubProvider {
        people_by_domain: HashMap<String, Vec<ContactRecord>>,
        phone_request: Mutex<Option<(Vec<String>, String)>>,
    }

    impl StubProvider {
        fn new(people_by_domain: HashMap<String, Vec<ContactRecord>>) -> Self {
            Self {
                people_by_domain,
                phone_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ContactEnrichmentProvider for StubProvider {
        async fn search_people(
            &self,
            domain: &str,
            _titles: &[String],
            _seniorities: &[String],
            _fetch_all: bool,
        ) -> Result<PeopleSearch, ProviderError> {
            if domain == "boom.example" {
                return Err(ProviderError::Api {
                    status: 500,
                    message: "people search exploded".to_string(),
                });
            }
            let people = self.people_by_domain.get(domain).cloned().unwrap_or_default();
            let total = people.len() as i32;
            Ok(PeopleSearch { people, total })
        }

        async fn bulk_match(
            &self,
            _apollo_ids: &[String],
        ) -> Result<Vec<ContactRecord>, ProviderError> {
            Ok(Vec::new())
        }

        async fn enrich_company(
            &self,
            _linkedin_url: &str,
        ) -> Result<Option<CompanyProfile>, ProviderError> {
            Ok(None)
        }

        async fn request_phone_numbers(
            &self,
            apollo_ids: &[String],
            webhook_url: &str,
        ) -> Result<(), ProviderError> {
            *self.phone_request.lock().unwrap() =
                Some((apollo_ids.to_vec(), webhook_url.to_string()));
            Ok(())
        }
    }

    fn record(id: &str, email: Option<&str>, phone: Option<&str>) -> ContactRecord {
        ContactRecord {
            apollo_id: id.to_string(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            title: Some("VP Engineering".to_string()),
            seniority: Some("vp".to_string()),
            email: email.map(String::from),
            email_status: None,
            phone: phone.map(String::from),
            linkedin_url: None,
        }
    }

    struct Fixture {
        db: Arc<DatabaseConnection>,
        use_case: EnrichCompaniesUseCase,
        provider: Arc<StubProvider>,
        company_repo: Arc<CompanyRepositoryImpl>,
        credits_repo: Arc<CreditsRepositoryImpl>,
        cache_repo: Arc<EmployeeCacheRepositoryImpl>,
        transaction_repo: Arc<EnrichmentTransactionRepositoryImpl>,
    }

    async fn setup(people_by_domain: HashMap<String, Vec<ContactRecord>>) -> Fixture {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db: Arc<DatabaseConnection> = Arc::new(db);
        Migrator::up(db.as_ref(), None).await.unwrap();

        let provider = Arc::new(StubProvider::new(people_by_domain));
        let company_repo = Arc::new(CompanyRepositoryImpl::new(db.clone()));
        let employee_repo = Arc::new(EmployeeRepositoryImpl::new(db.clone()));
        let lead_repo = Arc::new(LeadRepositoryImpl::new(db.clone()));
        let credits_repo = Arc::new(CreditsRepositoryImpl::new(db.clone()));
        let cache_repo = Arc::new(EmployeeCacheRepositoryImpl::new(db.clone()));
        let transaction_repo = Arc::new(EnrichmentTransactionRepositoryImpl::new(db.clone()));

        let gateway = Arc::new(EnrichmentCacheGateway::new(
            cache_repo.clone(),
            provider.clone(),
            168,
            10,
        ));

        let use_case = EnrichCompaniesUseCase::new(
            company_repo.clone(),
            employee_repo,
            lead_repo,
            credits_repo.clone(),
            cache_repo.clone(),
            transaction_repo.clone(),
            gateway,
            provider.clone(),
            EnrichmentOptions {
                company_delay_ms: 0,
                cache_ttl_hours: 168,
                default_credit_limit: 100,
                callback_base_url: "http://localhost:3000".to_string(),
            },
        );

        Fixture {
            db,
            use_case,
            provider,
            company_repo,
            credits_repo,
            cache_repo,
            transaction_repo,
        }
    }

    async fn create_company(
        fx: &Fixture,
        org_id: Uuid,
        name: &str,
        domain: Option<&str>,
    ) -> Company {
        let company = Company::new(
            org_id,
            Uuid::new_v4(),
            name.to_string(),
            domain.map(String::from),
            None,
        );
        fx.company_repo.insert(&company).await.unwrap()
    }

    #[tokio::test]
    async fn batch_partitions_and_counts_cache_usage() {
        let fx = setup(HashMap::from([(
            "fresh.example".to_string(),
            vec![record("p2", Some("p2@fresh.example"), None)],
        )]))
        .await;
        let org_id = Uuid::new_v4();

        let cached = create_company(&fx, org_id, "Cached Co", Some("cached.example")).await;
        let fresh = create_company(&fx, org_id, "Fresh Co", Some("fresh.example")).await;
        let bare = create_company(&fx, org_id, "Bare Co", None).await;

        fx.cache_repo
            .store(
                "cached.example",
                &[record("p1", Some("p1@cached.example"), None)],
                1,
            )
            .await
            .unwrap();

        let request = EnrichmentRequestDto {
            company_ids: Some(vec![cached.id, fresh.id, bare.id]),
            ..Default::default()
        };
        let response = fx.use_case.enrich(org_id, &request).await.unwrap();

        assert_eq!(response.companies_processed, 2);
        assert_eq!(response.companies_skipped, 1);
        assert_eq!(response.cache_hits, 1);
        assert_eq!(response.apollo_fetches, 1);
        assert_eq!(response.total_employees_created, 2);
        assert_eq!(response.total_leads_created, 2);
        assert_eq!(response.total_credits_used, 2);

        let skipped = response.skipped_companies.unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].id, bare.id);
        assert_eq!(skipped[0].reason, "No domain available");

        // Processed companies are flagged enriched, the skipped one is not
        for (id, expected) in [(cached.id, true), (fresh.id, true), (bare.id, false)] {
            let company = fx
                .company_repo
                .find_by_id(org_id, id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(company.is_enriched, expected);
            assert_eq!(company.enriched_at.is_some(), expected);
        }

        let history = fx.credits_repo.history(org_id, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 2);
        assert_eq!(history[0].operation, CreditOperation::Enrichment);

        let transactions = fx.transaction_repo.find_by_org(org_id, None).await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].credits_used, 2);
        assert_eq!(transactions[0].companies_processed, 2);
        assert_eq!(transactions[0].cache_hits, 1);
        assert_eq!(transactions[0].api_fetches, 1);
    }

    #[tokio::test]
    async fn reveal_phones_flags_leads_and_queues_ids() {
        let fx = setup(HashMap::from([(
            "acme.example".to_string(),
            vec![
                record("p1", Some("p1@acme.example"), None),
                record("p2", Some("p2@acme.example"), Some("+1555")),
            ],
        )]))
        .await;
        let org_id = Uuid::new_v4();
        let company = create_company(&fx, org_id, "Acme", Some("acme.example")).await;

        let request = EnrichmentRequestDto {
            company_ids: Some(vec![company.id]),
            filters: Some(EnrichmentFiltersDto::default()),
            reveal_phone_numbers: Some(true),
            ..Default::default()
        };
        let response = fx.use_case.enrich(org_id, &request).await.unwrap();

        // Only the phone-less contact is queued
        let phone = response.phone_enrichment.unwrap();
        assert_eq!(phone.leads_queued, 1);
        assert!(phone.started);

        let (ids, url) = fx.provider.phone_request.lock().unwrap().clone().unwrap();
        assert_eq!(ids, vec!["p1".to_string()]);
        assert_eq!(url, "http://localhost:3000/v1/webhooks/apollo");

        let leads = lead_entity::Entity::find()
            .filter(lead_entity::Column::OrgId.eq(org_id))
            .all(fx.db.as_ref())
            .await
            .unwrap();
        assert_eq!(leads.len(), 2);
        let pending: Vec<bool> = leads
            .iter()
            .map(|l| {
                l.metadata
                    .get("phone_pending")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false)
            })
            .collect();
        assert_eq!(pending.iter().filter(|p| **p).count(), 1);
    }

    #[tokio::test]
    async fn second_batch_creates_nothing_and_debits_nothing() {
        let fx = setup(HashMap::from([(
            "acme.example".to_string(),
            vec![record("p1", Some("p1@acme.example"), None)],
        )]))
        .await;
        let org_id = Uuid::new_v4();
        let company = create_company(&fx, org_id, "Acme", Some("acme.example")).await;

        let request = EnrichmentRequestDto {
            company_ids: Some(vec![company.id]),
            ..Default::default()
        };

        let first = fx.use_case.enrich(org_id, &request).await.unwrap();
        assert_eq!(first.total_leads_created, 1);
        assert_eq!(first.apollo_fetches, 1);

        let second = fx.use_case.enrich(org_id, &request).await.unwrap();
        assert_eq!(second.total_employees_created, 0);
        assert_eq!(second.total_leads_created, 0);
        assert_eq!(second.total_credits_used, 0);
        // The first batch warmed the cache
        assert_eq!(second.cache_hits, 1);

        let history = fx.credits_repo.history(org_id, None).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn reveal_on_rerun_leaves_existing_leads_alone() {
        let fx = setup(HashMap::from([(
            "acme.example".to_string(),
            vec![record("p1", Some("p1@acme.example"), None)],
        )]))
        .await;
        let org_id = Uuid::new_v4();
        let company = create_company(&fx, org_id, "Acme", Some("acme.example")).await;

        let request = EnrichmentRequestDto {
            company_ids: Some(vec![company.id]),
            ..Default::default()
        };
        let first = fx.use_case.enrich(org_id, &request).await.unwrap();
        assert_eq!(first.total_leads_created, 1);
        assert!(first.phone_enrichment.is_none());

        // Re-running with reveal queues nothing: the lead already exists
        let reveal_request = EnrichmentRequestDto {
            company_ids: Some(vec![company.id]),
            reveal_phone_numbers: Some(true),
            ..Default::default()
        };
        let second = fx.use_case.enrich(org_id, &reveal_request).await.unwrap();
        assert_eq!(second.total_leads_created, 0);
        assert!(second.phone_enrichment.is_none());
        assert!(fx.provider.phone_request.lock().unwrap().is_none());

        let leads = lead_entity::Entity::find()
            .filter(lead_entity::Column::OrgId.eq(org_id))
            .all(fx.db.as_ref())
            .await
            .unwrap();
        assert_eq!(leads.len(), 1);
        assert!(leads[0].metadata.get("phone_pending").is_none());
    }

    #[tokio::test]
    async fn fetch_error_is_recorded_per_company() {
        let fx = setup(HashMap::from([(
            "good.example".to_string(),
            vec![record("p1", Some("p1@good.example"), None)],
        )]))
        .await;
        let org_id = Uuid::new_v4();
        let boom = create_company(&fx, org_id, "Boom Co", Some("boom.example")).await;
        let good = create_company(&fx, org_id, "Good Co", Some("good.example")).await;

        let request = EnrichmentRequestDto {
            company_ids: Some(vec![boom.id, good.id]),
            ..Default::default()
        };
        let response = fx.use_case.enrich(org_id, &request).await.unwrap();

        assert_eq!(response.companies_processed, 1);
        assert_eq!(response.results.len(), 2);
        let boom_result = response
            .results
            .iter()
            .find(|r| r.company_id == boom.id)
            .unwrap();
        assert!(boom_result.error.as_deref().unwrap().contains("exploded"));
        assert_eq!(response.total_leads_created, 1);
    }

    #[tokio::test]
    async fn preview_is_read_only() {
        let fx = setup(HashMap::new()).await;
        let org_id = Uuid::new_v4();
        let with_domain = create_company(&fx, org_id, "Acme", Some("acme.example")).await;
        let bare = create_company(&fx, org_id, "Bare Co", None).await;

        fx.cache_repo
            .store("acme.example", &[record("p1", None, None)], 1)
            .await
            .unwrap();

        let preview = fx
            .use_case
            .preview(org_id, Some(&[with_domain.id, bare.id]))
            .await
            .unwrap();

        assert_eq!(preview.total_companies, 2);
        assert_eq!(preview.companies_with_domain, 1);
        assert_eq!(preview.companies_enriched, 0);
        assert_eq!(preview.credits_remaining, 100);

        let acme = preview
            .companies
            .iter()
            .find(|c| c.id == with_domain.id)
            .unwrap();
        assert!(acme.has_domain);
        assert!(acme.cache_status.exists);
        assert_eq!(acme.cache_status.employees_count, 1);
        assert!(!acme.cache_status.is_stale);

        let bare_preview = preview.companies.iter().find(|c| c.id == bare.id).unwrap();
        assert!(!bare_preview.cache_status.exists);

        // No mutation: nothing enriched, no usage row initialized
        let company = fx
            .company_repo
            .find_by_id(org_id, with_domain.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!company.is_enriched);
        assert!(matches!(
            fx.credits_repo.get_usage(org_id).await,
            Err(CreditsRepositoryError::CreditsNotFound(_))
        ));
    }
}
