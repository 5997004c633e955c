#[cfg(test)]
mod tests {
    use crate::domain::models::scraper_run::{ScraperRun, ScraperRunStatus};
    use crate::domain::repositories::scraper_run_repository::ScraperRunRepository;
    use crate::domain::services::stale_run_reaper::StaleRunReaper;
    use crate::infrastructure::repositories::scraper_run_repo_impl::ScraperRunRepositoryImpl;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use std::sync::Arc;
    use uuid::Uuid;

    async fn setup_db() -> Arc<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let db = Arc::new(db);
        Migrator::up(db.as_ref(), None).await.unwrap();
        db
    }

    async fn create_run(
        repo: &ScraperRunRepositoryImpl,
        search_id: Uuid,
        status: ScraperRunStatus,
        started_minutes_ago: i64,
    ) -> Uuid {
        let mut run = ScraperRun::new(search_id, Uuid::new_v4(), 0, serde_json::json!({}));
        run.status = status;
        run.started_at = Some((Utc::now() - chrono::Duration::minutes(started_minutes_ago)).into());
        repo.create(&run).await.unwrap();
        run.id
    }

    #[tokio::test]
    async fn reaps_only_stale_non_terminal_runs() {
        let db = setup_db().await;
        let repo = Arc::new(ScraperRunRepositoryImpl::new(db));
        let reaper = StaleRunReaper::new(repo.clone(), chrono::Duration::minutes(10));
        let search_id = Uuid::new_v4();

        let stale_running = create_run(&repo, search_id, ScraperRunStatus::Running, 15).await;
        let stale_queued = create_run(&repo, search_id, ScraperRunStatus::Queued, 20).await;
        let fresh_running = create_run(&repo, search_id, ScraperRunStatus::Running, 5).await;
        let old_completed = create_run(&repo, search_id, ScraperRunStatus::Completed, 60).await;
        // A different search must be untouched
        let other_search = create_run(&repo, Uuid::new_v4(), ScraperRunStatus::Running, 30).await;

        let reaped = reaper.reap(search_id).await.unwrap();
        assert_eq!(reaped, 2);

        for (id, expected) in [
            (stale_running, ScraperRunStatus::Failed),
            (stale_queued, ScraperRunStatus::Failed),
            (fresh_running, ScraperRunStatus::Running),
            (old_completed, ScraperRunStatus::Completed),
            (other_search, ScraperRunStatus::Running),
        ] {
            let run = repo.find_by_id(id).await.unwrap().unwrap();
            assert_eq!(run.status, expected);
        }

        let failed = repo.find_by_id(stale_running).await.unwrap().unwrap();
        assert!(failed.error_message.as_deref().unwrap().contains("timed out"));
        assert!(failed.completed_at.is_some());
    }

    #[tokio::test]
    async fn reap_is_idempotent() {
        let db = setup_db().await;
        let repo = Arc::new(ScraperRunRepositoryImpl::new(db));
        let reaper = StaleRunReaper::new(repo.clone(), chrono::Duration::minutes(10));
        let search_id = Uuid::new_v4();

        create_run(&repo, search_id, ScraperRunStatus::Running, 15).await;

        assert_eq!(reaper.reap(search_id).await.unwrap(), 1);
        assert_eq!(reaper.reap(search_id).await.unwrap(), 0);
    }
}
