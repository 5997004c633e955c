#[cfg(test)]
mod tests {
    use crate::domain::models::company::Company;
    use crate::domain::services::result_ingester::ResultIngester;
    use crate::infrastructure::database::entities::{company, job, lead};
    use crate::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
    use crate::infrastructure::repositories::employee_repo_impl::EmployeeRepositoryImpl;
    use crate::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
    use crate::infrastructure::repositories::lead_repo_impl::LeadRepositoryImpl;
    use crate::providers::traits::{
        CompanyProfile, ContactEnrichmentProvider, JobPosting, PeopleSearch, ProviderError,
    };
    use async_trait::async_trait;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    struct StubEnrichment {
        enrich_calls: AtomicUsize,
    }

    impl StubEnrichment {
        fn new() -> Self {
            Self {
                enrich_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContactEnrichmentProvider for StubEnrichment {
        async fn search_people(
            &self,
            _domain: &str,
            _titles: &[String],
            _seniorities: &[String],
            _fetch_all: bool,
        ) -> Result<PeopleSearch, ProviderError> {
            Ok(PeopleSearch::default())
        }

        async fn bulk_match(
            &self,
            _apollo_ids: &[String],
        ) -> Result<Vec<crate::domain::models::enrichment::ContactRecord>, ProviderError> {
            Ok(Vec::new())
        }

        async fn enrich_company(
            &self,
            _linkedin_url: &str,
        ) -> Result<Option<CompanyProfile>, ProviderError> {
            self.enrich_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(CompanyProfile {
                domain: Some("backfilled.example".to_string()),
                name: None,
            }))
        }

        async fn request_phone_numbers(
            &self,
            _apollo_ids: &[String],
            _webhook_url: &str,
        ) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    async fn setup_db() -> Arc<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db = Arc::new(db);
        Migrator::up(db.as_ref(), None).await.unwrap();
        db
    }

    fn ingester(db: Arc<DatabaseConnection>, provider: Arc<StubEnrichment>) -> ResultIngester {
        ResultIngester::new(
            Arc::new(CompanyRepositoryImpl::new(db.clone())),
            Arc::new(JobRepositoryImpl::new(db.clone())),
            Arc::new(EmployeeRepositoryImpl::new(db.clone())),
            Arc::new(LeadRepositoryImpl::new(db.clone())),
            provider,
        )
    }

    fn posting(
        external_id: &str,
        company: &str,
        domain: Option<&str>,
        poster: Option<&str>,
    ) -> JobPosting {
        JobPosting {
            external_id: external_id.to_string(),
            title: "Site Reliability Engineer".to_string(),
            company_name: company.to_string(),
            company_domain: domain.map(String::from),
            company_linkedin_url: None,
            location: Some("Berlin".to_string()),
            url: None,
            poster_profile_url: poster.map(String::from),
            posted_at: None,
        }
    }

    #[tokio::test]
    async fn ingest_creates_companies_jobs_and_leads() {
        let db = setup_db().await;
        let provider = Arc::new(StubEnrichment::new());
        let ingester = ingester(db.clone(), provider);
        let org_id = Uuid::new_v4();
        let search_id = Uuid::new_v4();

        let postings = vec![
            posting("j1", "Acme GmbH", Some("acme.com"), Some("https://p/jane")),
            posting("j2", "ACME gmbh", Some("acme.com"), Some("https://p/john")),
            posting("j3", "Globex", None, Some("https://p/jane")),
        ];

        let outcome = ingester
            .ingest(org_id, search_id, HashMap::new(), &postings)
            .await
            .unwrap();

        assert_eq!(outcome.jobs_found, 3);
        // "Acme GmbH" and "ACME gmbh" are the same company
        assert_eq!(outcome.companies_found, 2);
        assert_eq!(outcome.new_companies, 2);
        // jane posted twice; only one lead per distinct poster
        assert_eq!(outcome.leads_created, 2);

        let companies = company::Entity::find().count(db.as_ref()).await.unwrap();
        let jobs = job::Entity::find().count(db.as_ref()).await.unwrap();
        let leads = lead::Entity::find().count(db.as_ref()).await.unwrap();
        assert_eq!(companies, 2);
        assert_eq!(jobs, 3);
        assert_eq!(leads, 2);
    }

    #[tokio::test]
    async fn double_ingest_is_idempotent() {
        let db = setup_db().await;
        let provider = Arc::new(StubEnrichment::new());
        let ingester = ingester(db.clone(), provider);
        let org_id = Uuid::new_v4();
        let search_id = Uuid::new_v4();

        let postings = vec![
            posting("j1", "Acme", Some("acme.com"), Some("https://p/jane")),
            posting("j2", "Globex", Some("globex.com"), None),
        ];

        let first = ingester
            .ingest(org_id, search_id, HashMap::new(), &postings)
            .await
            .unwrap();
        assert_eq!(first.new_companies, 2);
        assert_eq!(first.leads_created, 1);

        // Fresh snapshot: the re-check against the store must catch everything
        let second = ingester
            .ingest(org_id, search_id, HashMap::new(), &postings)
            .await
            .unwrap();
        assert_eq!(second.new_companies, 0);
        assert_eq!(second.leads_created, 0);

        let companies = company::Entity::find().count(db.as_ref()).await.unwrap();
        let jobs = job::Entity::find().count(db.as_ref()).await.unwrap();
        let leads = lead::Entity::find().count(db.as_ref()).await.unwrap();
        assert_eq!(companies, 2);
        assert_eq!(jobs, 2);
        assert_eq!(leads, 1);
    }

    #[tokio::test]
    async fn recheck_catches_sibling_inserts() {
        let db = setup_db().await;
        let provider = Arc::new(StubEnrichment::new());
        let company_repo = CompanyRepositoryImpl::new(db.clone());
        let ingester = ingester(db.clone(), provider);
        let org_id = Uuid::new_v4();
        let search_id = Uuid::new_v4();

        // Simulates a sibling executor inserting after the snapshot was taken
        let existing = Company::new(org_id, search_id, "Acme".to_string(), None, None);
        crate::domain::repositories::company_repository::CompanyRepository::insert(
            &company_repo,
            &existing,
        )
        .await
        .unwrap();

        let postings = vec![posting("j1", "acme", Some("acme.com"), None)];
        let outcome = ingester
            .ingest(org_id, search_id, HashMap::new(), &postings)
            .await
            .unwrap();

        assert_eq!(outcome.new_companies, 0);
        let companies = company::Entity::find().count(db.as_ref()).await.unwrap();
        assert_eq!(companies, 1);
    }

    #[tokio::test]
    async fn backfills_missing_domain_from_profile() {
        let db = setup_db().await;
        let provider = Arc::new(StubEnrichment::new());
        let ingester = ingester(db.clone(), provider.clone());
        let org_id = Uuid::new_v4();
        let search_id = Uuid::new_v4();

        let mut p = posting("j1", "Initech", None, None);
        p.company_linkedin_url = Some("https://linkedin.com/company/initech".to_string());

        ingester
            .ingest(org_id, search_id, HashMap::new(), &[p])
            .await
            .unwrap();

        assert_eq!(provider.enrich_calls.load(Ordering::SeqCst), 1);
        let stored = company::Entity::find().one(db.as_ref()).await.unwrap().unwrap();
        assert_eq!(stored.domain.as_deref(), Some("backfilled.example"));
    }
}
