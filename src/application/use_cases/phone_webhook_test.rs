#[cfg(test)]
mod tests {
    use crate::application::dto::phone_webhook::{
        PhoneWebhookNumber, PhoneWebhookPayload, PhoneWebhookPerson,
    };
    use crate::application::use_cases::phone_webhook::PhoneWebhookUseCase;
    use crate::domain::models::enrichment::ContactRecord;
    use crate::domain::models::lead::Lead;
    use crate::domain::repositories::employee_repository::EmployeeRepository;
    use crate::domain::repositories::lead_repository::LeadRepository;
    use crate::infrastructure::database::entities::lead as lead_entity;
    use crate::infrastructure::repositories::employee_repo_impl::EmployeeRepositoryImpl;
    use crate::infrastructure::repositories::lead_repo_impl::LeadRepositoryImpl;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection, EntityTrait};
    use std::sync::Arc;
    use uuid::Uuid;

    async fn setup_db() -> Arc<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db = Arc::new(db);
        Migrator::up(db.as_ref(), None).await.unwrap();
        db
    }

    fn record(apollo_id: &str) -> ContactRecord {
        ContactRecord {
            apollo_id: apollo_id.to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
            title: None,
            seniority: None,
            email: Some("jane@acme.example".to_string()),
            email_status: None,
            phone: None,
            linkedin_url: None,
        }
    }

    fn person(id: &str, sanitized: Option<&str>, raw: Option<&str>) -> PhoneWebhookPerson {
        PhoneWebhookPerson {
            id: id.to_string(),
            phone_numbers: vec![PhoneWebhookNumber {
                sanitized_number: sanitized.map(String::from),
                raw_number: raw.map(String::from),
            }],
        }
    }

    #[tokio::test]
    async fn delivered_numbers_upgrade_employees_and_clear_leads() {
        let db = setup_db().await;
        let employee_repo = Arc::new(EmployeeRepositoryImpl::new(db.clone()));
        let lead_repo = Arc::new(LeadRepositoryImpl::new(db.clone()));
        let use_case = PhoneWebhookUseCase::new(employee_repo.clone(), lead_repo.clone());

        let org_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let (employee, created) = employee_repo
            .upsert_from_record(org_id, company_id, &record("p1"))
            .await
            .unwrap();
        assert!(created);

        let lead = Lead::new(org_id, company_id, employee.id).with_phone_pending();
        assert!(lead_repo.insert_skip_conflict(&lead).await.unwrap());

        let payload = PhoneWebhookPayload {
            people: vec![person("p1", Some("+15551234"), None)],
        };
        let response = use_case.handle(&payload).await.unwrap();

        assert_eq!(response.employees_updated, 1);
        assert_eq!(response.leads_cleared, 1);

        let (stored, _) = employee_repo
            .upsert_from_record(org_id, company_id, &record("p1"))
            .await
            .unwrap();
        assert_eq!(stored.phone.as_deref(), Some("+15551234"));

        let stored_lead = lead_entity::Entity::find_by_id(lead.id)
            .one(db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert!(stored_lead.metadata.get("phone_pending").is_none());
    }

    #[tokio::test]
    async fn people_without_numbers_or_matches_are_skipped() {
        let db = setup_db().await;
        let employee_repo = Arc::new(EmployeeRepositoryImpl::new(db.clone()));
        let lead_repo = Arc::new(LeadRepositoryImpl::new(db.clone()));
        let use_case = PhoneWebhookUseCase::new(employee_repo, lead_repo);

        let payload = PhoneWebhookPayload {
            people: vec![
                person("no-numbers", None, None),
                person("unknown-person", Some("+15550000"), None),
            ],
        };
        let response = use_case.handle(&payload).await.unwrap();

        assert_eq!(response.employees_updated, 0);
        assert_eq!(response.leads_cleared, 0);
    }

    #[tokio::test]
    async fn raw_number_is_used_when_sanitized_is_missing() {
        let db = setup_db().await;
        let employee_repo = Arc::new(EmployeeRepositoryImpl::new(db.clone()));
        let lead_repo = Arc::new(LeadRepositoryImpl::new(db.clone()));
        let use_case = PhoneWebhookUseCase::new(employee_repo.clone(), lead_repo);

        let org_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        employee_repo
            .upsert_from_record(org_id, company_id, &record("p2"))
            .await
            .unwrap();

        let payload = PhoneWebhookPayload {
            people: vec![person("p2", None, Some("555 1234"))],
        };
        let response = use_case.handle(&payload).await.unwrap();
        assert_eq!(response.employees_updated, 1);

        let (stored, _) = employee_repo
            .upsert_from_record(org_id, company_id, &record("p2"))
            .await
            .unwrap();
        assert_eq!(stored.phone.as_deref(), Some("555 1234"));
    }
}
