#[cfg(test)]
mod tests {
    use crate::application::dto::run_request::RunSearchRequestDto;
    use crate::application::use_cases::run_search::{RunSearchError, RunSearchUseCase};
    use crate::domain::models::credits::CreditOperation;
    use crate::domain::models::enrichment::ContactRecord;
    use crate::domain::models::scraper_run::{ScraperRun, ScraperRunStatus};
    use crate::domain::models::search::{ScraperConfig, Search, SearchStatus};
    use crate::domain::repositories::company_repository::CompanyRepository;
    use crate::domain::repositories::credits_repository::CreditsRepository;
    use crate::domain::repositories::scraper_run_repository::ScraperRunRepository;
    use crate::domain::repositories::search_repository::SearchRepository;
    use crate::domain::services::result_ingester::ResultIngester;
    use crate::domain::services::scraper_executor::ScraperExecutor;
    use crate::domain::services::stale_run_reaper::StaleRunReaper;
    use crate::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
    use crate::infrastructure::repositories::credits_repo_impl::CreditsRepositoryImpl;
    use crate::infrastructure::repositories::employee_repo_impl::EmployeeRepositoryImpl;
    use crate::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
    use crate::infrastructure::repositories::lead_repo_impl::LeadRepositoryImpl;
    use crate::infrastructure::repositories::scraper_run_repo_impl::ScraperRunRepositoryImpl;
    use crate::infrastructure::repositories::search_repo_impl::SearchRepositoryImpl;
    use crate::providers::traits::{
        CompanyProfile, ContactEnrichmentProvider, JobPosting, JobSource, PeopleSearch,
        ProviderError,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn posting_for(config: &ScraperConfig, company_name: &str) -> JobPosting {
        let slug = config.title.to_lowercase().replace(' ', "-");
        JobPosting {
            external_id: format!("job-{slug}"),
            title: config.title.clone(),
            company_name: company_name.to_string(),
            company_domain: Some(format!("{slug}.example")),
            company_linkedin_url: None,
            location: Some(config.location.clone()),
            url: None,
            poster_profile_url: Some(format!("https://p/{slug}")),
            posted_at: None,
        }
    }

    /// One posting per config, company derived from the config title
    struct StubJobSource;

    #[async_trait]
    impl JobSource for StubJobSource {
        async fn search_jobs(
            &self,
            config: &ScraperConfig,
        ) -> Result<Vec<JobPosting>, ProviderError> {
            Ok(vec![posting_for(config, &format!("{} Corp", config.title))])
        }
    }

    /// Fails for titles containing "Broken", succeeds otherwise
    struct FlakyJobSource;

    #[async_trait]
    impl JobSource for FlakyJobSource {
        async fn search_jobs(
            &self,
            config: &ScraperConfig,
        ) -> Result<Vec<JobPosting>, ProviderError> {
            if config.title.contains("Broken") {
                return Err(ProviderError::Api {
                    status: 502,
                    message: "upstream exploded".to_string(),
                });
            }
            Ok(vec![posting_for(config, &format!("{} Corp", config.title))])
        }
    }

    /// Every config resolves to the same employer; the named config is
    /// delayed so its ingest observes the sibling's insert
    struct SharedCompanySource {
        delayed_title: String,
    }

    #[async_trait]
    impl JobSource for SharedCompanySource {
        async fn search_jobs(
            &self,
            config: &ScraperConfig,
        ) -> Result<Vec<JobPosting>, ProviderError> {
            if config.title == self.delayed_title {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Ok(vec![posting_for(config, "Acme")])
        }
    }

    struct NullEnrichment;

    #[async_trait]
    impl ContactEnrichmentProvider for NullEnrichment {
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
            _apollo_ids: &[String],
            _webhook_url: &str,
        ) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    struct Fixture {
        use_case: RunSearchUseCase,
        search_repo: Arc<SearchRepositoryImpl>,
        run_repo: Arc<ScraperRunRepositoryImpl>,
        company_repo: Arc<CompanyRepositoryImpl>,
        credits_repo: Arc<CreditsRepositoryImpl>,
    }

    async fn setup() -> Fixture {
        setup_with_source(Arc::new(StubJobSource)).await
    }

    async fn setup_with_source(job_source: Arc<dyn JobSource>) -> Fixture {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db: Arc<DatabaseConnection> = Arc::new(db);
        Migrator::up(db.as_ref(), None).await.unwrap();

        let search_repo = Arc::new(SearchRepositoryImpl::new(db.clone()));
        let run_repo = Arc::new(ScraperRunRepositoryImpl::new(db.clone()));
        let company_repo = Arc::new(CompanyRepositoryImpl::new(db.clone()));
        let credits_repo = Arc::new(CreditsRepositoryImpl::new(db.clone()));

        let ingester = Arc::new(ResultIngester::new(
            company_repo.clone(),
            Arc::new(JobRepositoryImpl::new(db.clone())),
            Arc::new(EmployeeRepositoryImpl::new(db.clone())),
            Arc::new(LeadRepositoryImpl::new(db.clone())),
            Arc::new(NullEnrichment),
        ));
        let executor = Arc::new(ScraperExecutor::new(
            run_repo.clone(),
            job_source,
            ingester,
            Duration::from_secs(5),
        ));
        let reaper = Arc::new(StaleRunReaper::new(
            run_repo.clone(),
            chrono::Duration::minutes(10),
        ));

        let use_case = RunSearchUseCase::new(
            search_repo.clone(),
            run_repo.clone(),
            company_repo.clone(),
            credits_repo.clone(),
            executor,
            reaper,
            100,
        );

        Fixture {
            use_case,
            search_repo,
            run_repo,
            company_repo,
            credits_repo,
        }
    }

    async fn create_search(
        repo: &SearchRepositoryImpl,
        org_id: Uuid,
        configs: Vec<ScraperConfig>,
    ) -> Search {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let search = Search {
            id: Uuid::new_v4(),
            org_id,
            name: "SRE hunt".to_string(),
            scraper_configs: configs,
            status: SearchStatus::Idle,
            results_count: 0,
            jobs_count: 0,
            last_run_at: None,
            created_at: now,
            updated_at: now,
        };
        repo.create(&search).await.unwrap()
    }

    fn config(title: &str) -> ScraperConfig {
        ScraperConfig {
            title: title.to_string(),
            location: "Berlin".to_string(),
            experience_level: None,
        }
    }

    #[tokio::test]
    async fn trigger_fans_out_all_configs_and_debits_once() {
        let fx = setup().await;
        let org_id = Uuid::new_v4();
        let search = create_search(
            &fx.search_repo,
            org_id,
            vec![config("SRE"), config("Platform Engineer")],
        )
        .await;

        let response = fx
            .use_case
            .trigger(org_id, search.id, &RunSearchRequestDto::default())
            .await
            .unwrap();

        assert_eq!(response.scrapers_run, 2);
        assert_eq!(response.total_jobs_found, 2);
        assert_eq!(response.total_new_companies, 2);
        assert_eq!(response.total_leads_created, 2);
        assert_eq!(response.scraper_results.len(), 2);
        assert!(response.scraper_results.iter().all(|r| r.error.is_none()));

        let runs = fx.run_repo.find_by_search(search.id).await.unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.status == ScraperRunStatus::Completed));

        let stored = fx
            .search_repo
            .find_by_id(org_id, search.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.results_count, 2);
        assert_eq!(stored.jobs_count, 2);
        assert!(stored.last_run_at.is_some());
        assert_eq!(stored.status, SearchStatus::Idle);

        // One debit for the whole fan-out, referencing the search
        let history = fx.credits_repo.history(org_id, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 2);
        assert_eq!(history[0].operation, CreditOperation::SearchRun);
        assert_eq!(history[0].reference_id, Some(search.id));
        assert_eq!(history[0].balance_after, 98);

        let usage = fx.credits_repo.get_usage(org_id).await.unwrap();
        assert_eq!(usage.credits_used, 2);
        assert_eq!(usage.credits_limit, 100);
    }

    #[tokio::test]
    async fn failed_sibling_is_excluded_from_totals_and_the_debit() {
        let fx = setup_with_source(Arc::new(FlakyJobSource)).await;
        let org_id = Uuid::new_v4();
        let search = create_search(
            &fx.search_repo,
            org_id,
            vec![config("SRE"), config("Broken Pipeline"), config("Platform Engineer")],
        )
        .await;

        let response = fx
            .use_case
            .trigger(org_id, search.id, &RunSearchRequestDto::default())
            .await
            .unwrap();

        assert_eq!(response.scrapers_run, 3);
        assert_eq!(response.total_jobs_found, 2);
        assert_eq!(response.total_new_companies, 2);
        assert_eq!(response.total_leads_created, 2);

        let failed = &response.scraper_results[1];
        assert_eq!(failed.scraper_index, 1);
        assert!(failed.error.as_deref().unwrap().contains("upstream exploded"));
        assert!(response.scraper_results[0].error.is_none());
        assert!(response.scraper_results[2].error.is_none());

        let runs = fx.run_repo.find_by_search(search.id).await.unwrap();
        assert_eq!(runs.len(), 3);
        assert_eq!(
            runs.iter()
                .filter(|r| r.status == ScraperRunStatus::Completed)
                .count(),
            2
        );
        let failed_run = runs
            .iter()
            .find(|r| r.status == ScraperRunStatus::Failed)
            .unwrap();
        assert_eq!(failed_run.scraper_index, 1);
        assert!(failed_run.error_message.is_some());

        // The debit covers the successful siblings only
        let history = fx.credits_repo.history(org_id, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 2);

        let stored = fx
            .search_repo
            .find_by_id(org_id, search.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.results_count, 2);
        assert_eq!(stored.status, SearchStatus::Idle);
    }

    #[tokio::test]
    async fn siblings_discovering_the_same_company_share_one_row() {
        let fx = setup_with_source(Arc::new(SharedCompanySource {
            delayed_title: "Platform Engineer".to_string(),
        }))
        .await;
        let org_id = Uuid::new_v4();
        let search = create_search(
            &fx.search_repo,
            org_id,
            vec![config("SRE"), config("Platform Engineer")],
        )
        .await;

        let response = fx
            .use_case
            .trigger(org_id, search.id, &RunSearchRequestDto::default())
            .await
            .unwrap();

        // Both batches saw Acme, only the first created it
        assert_eq!(response.total_jobs_found, 2);
        assert_eq!(response.total_companies_found, 2);
        assert_eq!(response.total_new_companies, 1);
        assert_eq!(response.total_leads_created, 2);

        let index = fx.company_repo.name_index(org_id, search.id).await.unwrap();
        assert_eq!(index.len(), 1);
        let acme = fx
            .company_repo
            .find_by_name_ci(org_id, search.id, "acme")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(acme.name, "Acme");

        let stored = fx
            .search_repo
            .find_by_id(org_id, search.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.results_count, 1);
        assert_eq!(stored.jobs_count, 2);

        let history = fx.credits_repo.history(org_id, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 1);
    }

    #[tokio::test]
    async fn missing_search_is_not_found() {
        let fx = setup().await;

        let result = fx
            .use_case
            .trigger(Uuid::new_v4(), Uuid::new_v4(), &RunSearchRequestDto::default())
            .await;

        assert!(matches!(result, Err(RunSearchError::NotFound)));
    }

    #[tokio::test]
    async fn out_of_range_index_rejects_before_creating_runs() {
        let fx = setup().await;
        let org_id = Uuid::new_v4();
        let search = create_search(&fx.search_repo, org_id, vec![config("SRE")]).await;

        let request = RunSearchRequestDto {
            scraper_index: Some(5),
        };
        let result = fx.use_case.trigger(org_id, search.id, &request).await;

        assert!(matches!(result, Err(RunSearchError::NotFound)));
        assert!(fx.run_repo.find_by_search(search.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_index_runs_only_that_config() {
        let fx = setup().await;
        let org_id = Uuid::new_v4();
        let search = create_search(
            &fx.search_repo,
            org_id,
            vec![config("SRE"), config("Data Engineer")],
        )
        .await;

        let request = RunSearchRequestDto {
            scraper_index: Some(1),
        };
        let response = fx.use_case.trigger(org_id, search.id, &request).await.unwrap();

        assert_eq!(response.scrapers_run, 1);
        assert_eq!(response.scraper_results[0].scraper_index, 1);

        let runs = fx.run_repo.find_by_search(search.id).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].scraper_index, 1);
    }

    #[tokio::test]
    async fn exhausted_credits_reject_before_any_run_row() {
        let fx = setup().await;
        let org_id = Uuid::new_v4();
        let search = create_search(&fx.search_repo, org_id, vec![config("SRE")]).await;

        fx.credits_repo
            .initialize_org_credits(org_id, 1)
            .await
            .unwrap();
        fx.credits_repo
            .debit(
                org_id,
                1,
                CreditOperation::ManualAdjustment,
                "drain".to_string(),
                None,
            )
            .await
            .unwrap();

        let result = fx
            .use_case
            .trigger(org_id, search.id, &RunSearchRequestDto::default())
            .await;

        assert!(matches!(result, Err(RunSearchError::InsufficientCredits(0))));
        assert!(fx.run_repo.find_by_search(search.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_runs_are_reaped_before_the_new_fan_out() {
        let fx = setup().await;
        let org_id = Uuid::new_v4();
        let search = create_search(&fx.search_repo, org_id, vec![config("SRE")]).await;

        let mut orphan = ScraperRun::new(search.id, org_id, 0, serde_json::json!({}));
        orphan.status = ScraperRunStatus::Running;
        orphan.started_at = Some((Utc::now() - chrono::Duration::minutes(20)).into());
        fx.run_repo.create(&orphan).await.unwrap();

        fx.use_case
            .trigger(org_id, search.id, &RunSearchRequestDto::default())
            .await
            .unwrap();

        let stored = fx.run_repo.find_by_id(orphan.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ScraperRunStatus::Failed);
        assert!(stored.error_message.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn empty_config_list_is_a_validation_error() {
        let fx = setup().await;
        let org_id = Uuid::new_v4();
        let search = create_search(&fx.search_repo, org_id, vec![]).await;

        let result = fx
            .use_case
            .trigger(org_id, search.id, &RunSearchRequestDto::default())
            .await;

        assert!(matches!(result, Err(RunSearchError::ValidationError(_))));
    }

    #[tokio::test]
    async fn list_runs_requires_the_search_to_exist() {
        let fx = setup().await;
        let org_id = Uuid::new_v4();
        let search = create_search(&fx.search_repo, org_id, vec![config("SRE")]).await;

        fx.use_case
            .trigger(org_id, search.id, &RunSearchRequestDto::default())
            .await
            .unwrap();

        let runs = fx.use_case.list_runs(org_id, search.id).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, "completed");

        let missing = fx.use_case.list_runs(org_id, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(RunSearchError::NotFound)));
    }
}
