use job_finder_bot::config::AppConfig;

#[test]
fn test_default_config_is_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_values() {
    let config = AppConfig::default();
    assert_eq!(config.schedule.daily_time, "09:00");
    assert!(config.schedule.enabled);
    assert_eq!(config.schedule.tick_interval_secs, 1);
    assert_eq!(config.sources.max_results_per_source, 5);
    assert_eq!(config.sources.jobs_api.host, "jobs-api14.p.rapidapi.com");
    assert!(config.sources.jobs_api.api_key.is_none());
}

#[test]
fn test_zero_tick_interval_rejected() {
    let mut config = AppConfig::default();
    config.schedule.tick_interval_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_bad_daily_time_rejected() {
    let mut config = AppConfig::default();
    config.schedule.daily_time = "nine".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_bad_log_level_rejected() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}
