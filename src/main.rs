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

use axum::Extension;
use prospectrs::application::use_cases::enrich_companies::{
    EnrichCompaniesUseCase, EnrichmentOptions,
};
use prospectrs::application::use_cases::phone_webhook::PhoneWebhookUseCase;
use prospectrs::application::use_cases::run_search::RunSearchUseCase;
use prospectrs::config::settings::Settings;
use prospectrs::domain::repositories::credits_repository::CreditsRepository;
use prospectrs::domain::services::enrichment_cache::EnrichmentCacheGateway;
use prospectrs::domain::services::result_ingester::ResultIngester;
use prospectrs::domain::services::scraper_executor::ScraperExecutor;
use prospectrs::domain::services::stale_run_reaper::StaleRunReaper;
use prospectrs::infrastructure::database::connection;
use prospectrs::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
use prospectrs::infrastructure::repositories::credits_repo_impl::CreditsRepositoryImpl;
use prospectrs::infrastructure::repositories::employee_cache_repo_impl::EmployeeCacheRepositoryImpl;
use prospectrs::infrastructure::repositories::employee_repo_impl::EmployeeRepositoryImpl;
use prospectrs::infrastructure::repositories::enrichment_transaction_repo_impl::EnrichmentTransactionRepositoryImpl;
use prospectrs::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use prospectrs::infrastructure::repositories::lead_repo_impl::LeadRepositoryImpl;
use prospectrs::infrastructure::repositories::scraper_run_repo_impl::ScraperRunRepositoryImpl;
use prospectrs::infrastructure::repositories::search_repo_impl::SearchRepositoryImpl;
use prospectrs::presentation::routes;
use prospectrs::providers::apollo::ApolloClient;
use prospectrs::providers::job_source::HttpJobSource;
use prospectrs::utils::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting prospectrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    prospectrs::infrastructure::metrics::init_metrics(&settings.metrics.listen_addr);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Repositories
    let search_repo = Arc::new(SearchRepositoryImpl::new(db.clone()));
    let run_repo = Arc::new(ScraperRunRepositoryImpl::new(db.clone()));
    let company_repo = Arc::new(CompanyRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let employee_repo = Arc::new(EmployeeRepositoryImpl::new(db.clone()));
    let lead_repo = Arc::new(LeadRepositoryImpl::new(db.clone()));
    let credits_repo: Arc<dyn CreditsRepository> =
        Arc::new(CreditsRepositoryImpl::new(db.clone()));
    let cache_repo = Arc::new(EmployeeCacheRepositoryImpl::new(db.clone()));
    let transaction_repo = Arc::new(EnrichmentTransactionRepositoryImpl::new(db.clone()));

    // 5. External providers
    let job_source = Arc::new(HttpJobSource::new(&settings.providers));
    let apollo = Arc::new(ApolloClient::new(
        &settings.providers,
        settings.enrichment.page_size,
    ));
    info!("External providers initialized");

    // 6. Domain services
    let ingester = Arc::new(ResultIngester::new(
        company_repo.clone(),
        job_repo.clone(),
        employee_repo.clone(),
        lead_repo.clone(),
        apollo.clone(),
    ));
    let executor = Arc::new(ScraperExecutor::new(
        run_repo.clone(),
        job_source,
        ingester,
        Duration::from_secs(settings.scraping.task_timeout_secs),
    ));
    let reaper = Arc::new(StaleRunReaper::new(
        run_repo.clone(),
        chrono::Duration::seconds(settings.scraping.stale_after_secs),
    ));
    let gateway = Arc::new(EnrichmentCacheGateway::new(
        cache_repo.clone(),
        apollo.clone(),
        settings.enrichment.cache_ttl_hours,
        settings.enrichment.bulk_match_chunk_size,
    ));

    // 7. Use cases
    let run_search = Arc::new(RunSearchUseCase::new(
        search_repo.clone(),
        run_repo.clone(),
        company_repo.clone(),
        credits_repo.clone(),
        executor,
        reaper,
        settings.credits.default_limit,
    ));
    let enrich_companies = Arc::new(EnrichCompaniesUseCase::new(
        company_repo.clone(),
        employee_repo.clone(),
        lead_repo.clone(),
        credits_repo.clone(),
        cache_repo.clone(),
        transaction_repo.clone(),
        gateway,
        apollo.clone(),
        EnrichmentOptions {
            company_delay_ms: settings.enrichment.company_delay_ms,
            cache_ttl_hours: settings.enrichment.cache_ttl_hours,
            default_credit_limit: settings.credits.default_limit,
            callback_base_url: settings.webhook.callback_base_url.clone(),
        },
    ));
    let phone_webhook = Arc::new(PhoneWebhookUseCase::new(
        employee_repo.clone(),
        lead_repo.clone(),
    ));

    // 8. Start HTTP server
    let app = routes::routes()
        .layer(Extension(run_search))
        .layer(Extension(enrich_companies))
        .layer(Extension(phone_webhook))
        .layer(Extension(credits_repo))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
