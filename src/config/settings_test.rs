#[cfg(test)]
mod tests {
    use crate::config::settings::Settings;

    #[test]
    fn defaults_cover_every_section() {
        let settings = Settings::new().expect("defaults should satisfy every section");

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.scraping.task_timeout_secs, 120);
        assert_eq!(settings.scraping.stale_after_secs, 600);
        assert_eq!(settings.enrichment.cache_ttl_hours, 168);
        assert_eq!(settings.enrichment.company_delay_ms, 500);
        assert_eq!(settings.enrichment.bulk_match_chunk_size, 10);
        assert_eq!(settings.credits.default_limit, 1000);
        assert_eq!(settings.providers.request_timeout_secs, 90);
        assert_eq!(settings.metrics.listen_addr, "0.0.0.0:9000");
    }

    // The task timeout must stay under the stale threshold so a hung
    // executor is timed out before the reaper declares its run orphaned
    #[test]
    fn default_task_timeout_is_below_stale_threshold() {
        let settings = Settings::new().unwrap();
        assert!((settings.scraping.task_timeout_secs as i64) < settings.scraping.stale_after_secs);
    }
}
