#[cfg(test)]
mod tests {
    use crate::domain::models::enrichment::ContactRecord;
    use crate::domain::repositories::employee_cache_repository::EmployeeCacheRepository;
    use crate::domain::services::enrichment_cache::EnrichmentCacheGateway;
    use crate::infrastructure::database::entities::employee_cache;
    use crate::infrastructure::repositories::employee_cache_repo_impl::EmployeeCacheRepositoryImpl;
    use crate::providers::traits::{
        CompanyProfile, ContactEnrichmentProvider, PeopleSearch, ProviderError,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    struct StubProvider {
        search_calls: AtomicUsize,
        bulk_calls: AtomicUsize,
        people: Vec<ContactRecord>,
        matches: Vec<ContactRecord>,
    }

    impl StubProvider {
        fn new(people: Vec<ContactRecord>, matches: Vec<ContactRecord>) -> Self {
            Self {
                search_calls: AtomicUsize::new(0),
                bulk_calls: AtomicUsize::new(0),
                people,
                matches,
            }
        }
    }

    #[async_trait]
    impl ContactEnrichmentProvider for StubProvider {
        async fn search_people(
            &self,
            _domain: &str,
            _titles: &[String],
            _seniorities: &[String],
            _fetch_all: bool,
        ) -> Result<PeopleSearch, ProviderError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(PeopleSearch {
                people: self.people.clone(),
                total: self.people.len() as i32,
            })
        }

        async fn bulk_match(
            &self,
            apollo_ids: &[String],
        ) -> Result<Vec<ContactRecord>, ProviderError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .matches
                .iter()
                .filter(|m| apollo_ids.contains(&m.apollo_id))
                .cloned()
                .collect())
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

    fn record(id: &str, email: Option<&str>) -> ContactRecord {
        ContactRecord {
            apollo_id: id.to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
            title: Some("VP Engineering".to_string()),
            seniority: Some("vp".to_string()),
            email: email.map(String::from),
            email_status: None,
            phone: None,
            linkedin_url: None,
        }
    }

    async fn setup_db() -> Arc<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db = Arc::new(db);
        Migrator::up(db.as_ref(), None).await.unwrap();
        db
    }

    async fn seed_cache(
        db: &DatabaseConnection,
        domain: &str,
        records: &[ContactRecord],
        fetched_hours_ago: i64,
    ) {
        let entry = employee_cache::ActiveModel {
            id: Set(Uuid::new_v4()),
            domain: Set(domain.to_string()),
            employees: Set(serde_json::to_value(records).unwrap()),
            total_available: Set(records.len() as i32),
            fetched_at: Set((Utc::now() - chrono::Duration::hours(fetched_hours_ago)).into()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };
        entry.insert(db).await.unwrap();
    }

    #[tokio::test]
    async fn fresh_cache_skips_the_provider() {
        let db = setup_db().await;
        seed_cache(&db, "acme.com", &[record("p1", Some("jane@acme.com"))], 1).await;

        let provider = Arc::new(StubProvider::new(vec![], vec![]));
        let gateway = EnrichmentCacheGateway::new(
            Arc::new(EmployeeCacheRepositoryImpl::new(db)),
            provider.clone(),
            168,
            10,
        );

        let result = gateway
            .fetch_employees("acme.com", &[], &[], false)
            .await
            .unwrap();

        assert!(result.cache_hit);
        assert_eq!(result.records.len(), 1);
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.bulk_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_cache_refetches_and_stores() {
        let db = setup_db().await;
        seed_cache(&db, "acme.com", &[record("old", Some("old@acme.com"))], 200).await;

        let provider = Arc::new(StubProvider::new(
            vec![record("p1", Some("jane@acme.com"))],
            vec![],
        ));
        let cache_repo = Arc::new(EmployeeCacheRepositoryImpl::new(db));
        let gateway =
            EnrichmentCacheGateway::new(cache_repo.clone(), provider.clone(), 168, 10);

        let result = gateway
            .fetch_employees("acme.com", &[], &[], false)
            .await
            .unwrap();

        assert!(!result.cache_hit);
        assert_eq!(result.records[0].apollo_id, "p1");
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);

        // The cache entry was replaced and is fresh again
        let entry = cache_repo.find_by_domain("acme.com").await.unwrap().unwrap();
        assert_eq!(entry.employees[0].apollo_id, "p1");
        assert!(!entry.is_stale(168));
    }

    #[tokio::test]
    async fn bulk_match_fills_only_missing_emails() {
        let db = setup_db().await;
        seed_cache(
            &db,
            "acme.com",
            &[
                record("p1", Some("known@acme.com")),
                record("p2", Some("email_not_unlocked@domain.com")),
                record("p3", None),
            ],
            1,
        )
        .await;

        let provider = Arc::new(StubProvider::new(
            vec![],
            vec![
                record("p2", Some("unlocked@acme.com")),
                record("p3", Some("found@acme.com")),
            ],
        ));
        let cache_repo = Arc::new(EmployeeCacheRepositoryImpl::new(db));
        let gateway =
            EnrichmentCacheGateway::new(cache_repo.clone(), provider.clone(), 168, 10);

        let result = gateway
            .fetch_employees("acme.com", &[], &[], false)
            .await
            .unwrap();

        assert!(result.cache_hit);
        let by_id = |id: &str| {
            result
                .records
                .iter()
                .find(|r| r.apollo_id == id)
                .unwrap()
                .email
                .clone()
        };
        assert_eq!(by_id("p1").as_deref(), Some("known@acme.com"));
        assert_eq!(by_id("p2").as_deref(), Some("unlocked@acme.com"));
        assert_eq!(by_id("p3").as_deref(), Some("found@acme.com"));

        // Upgraded emails are persisted back into the cache entry
        let entry = cache_repo.find_by_domain("acme.com").await.unwrap().unwrap();
        let cached_p2 = entry.employees.iter().find(|r| r.apollo_id == "p2").unwrap();
        assert_eq!(cached_p2.email.as_deref(), Some("unlocked@acme.com"));
    }

    #[tokio::test]
    async fn bulk_match_respects_chunk_size() {
        let db = setup_db().await;
        let people: Vec<ContactRecord> =
            (0..25).map(|i| record(&format!("p{i}"), None)).collect();
        seed_cache(&db, "acme.com", &people, 1).await;

        let provider = Arc::new(StubProvider::new(vec![], vec![]));
        let gateway = EnrichmentCacheGateway::new(
            Arc::new(EmployeeCacheRepositoryImpl::new(db)),
            provider.clone(),
            168,
            10,
        );

        gateway
            .fetch_employees("acme.com", &[], &[], false)
            .await
            .unwrap();

        // 25 ids at chunk size 10 -> 3 bulk-match calls
        assert_eq!(provider.bulk_calls.load(Ordering::SeqCst), 3);
    }
}
