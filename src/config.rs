use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub schedule: ScheduleConfig,
    pub sources: SourcesConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Daily alert time in 24-hour HH:MM, local wall clock
    pub daily_time: String,
    /// Whether the daily trigger is armed at startup
    pub enabled: bool,
    /// Polling cadence of the scheduler loop
    pub tick_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Per-request timeout applied to every job source call
    pub http_timeout_secs: u64,
    /// Max postings returned per source per call
    pub max_results_per_source: usize,
    pub linkedin: LinkedInConfig,
    pub jobs_api: JobsApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInConfig {
    pub enabled: bool,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsApiConfig {
    pub enabled: bool,
    pub host: String,
    /// RapidAPI key; normally supplied via the RAPID_API_KEY env var
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token; normally supplied via the TELEGRAM_API_KEY env var
    pub token: Option<String>,
    /// Long-poll timeout for getUpdates
    pub poll_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "data/job_finder_bot.db".to_string(),
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            schedule: ScheduleConfig {
                daily_time: "09:00".to_string(),
                enabled: true,
                tick_interval_secs: 1,
            },
            sources: SourcesConfig {
                http_timeout_secs: 30,
                max_results_per_source: 5,
                linkedin: LinkedInConfig {
                    enabled: true,
                    base_url: "https://www.linkedin.com/jobs/search/".to_string(),
                },
                jobs_api: JobsApiConfig {
                    enabled: true,
                    host: "jobs-api14.p.rapidapi.com".to_string(),
                    api_key: None,
                },
            },
            telegram: TelegramConfig {
                token: None,
                poll_timeout_secs: 30,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        // Start with default values
        for (key, value) in AppConfig::default() {
            builder = builder.set_default(key.as_str(), value)?;
        }

        let config = builder
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("JOB_BOT").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate database config
        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections must be greater than 0"));
        }
        if self.database.connection_timeout_secs == 0 {
            return Err(anyhow::anyhow!("connection_timeout_secs must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate schedule config
        self.schedule
            .daily_time
            .parse::<crate::models::ScheduleTime>()
            .map_err(|e| anyhow::anyhow!("Invalid schedule.daily_time: {}", e))?;
        if self.schedule.tick_interval_secs == 0 {
            return Err(anyhow::anyhow!("tick_interval_secs must be greater than 0"));
        }

        // Validate source config
        if self.sources.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("http_timeout_secs must be greater than 0"));
        }
        if self.sources.max_results_per_source == 0 {
            return Err(anyhow::anyhow!("max_results_per_source must be greater than 0"));
        }

        Ok(())
    }

    /// Get database path from environment or config
    pub fn get_database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.database.url.clone())
    }

    /// Get the Telegram bot token from environment or config
    pub fn get_telegram_token(&self) -> Option<String> {
        std::env::var("TELEGRAM_API_KEY")
            .ok()
            .or_else(|| self.telegram.token.clone())
    }

    /// Get the RapidAPI key from environment or config
    pub fn get_rapid_api_key(&self) -> Option<String> {
        std::env::var("RAPID_API_KEY")
            .ok()
            .or_else(|| self.sources.jobs_api.api_key.clone())
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

impl IntoIterator for AppConfig {
    type Item = (String, config::Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, config::Value>;

    fn into_iter(self) -> Self::IntoIter {
        let mut map = std::collections::HashMap::new();

        // Flatten the configuration into key-value pairs
        map.insert("database.url".to_string(), config::Value::from(self.database.url));
        map.insert("database.max_connections".to_string(), config::Value::from(self.database.max_connections));
        map.insert("database.connection_timeout_secs".to_string(), config::Value::from(self.database.connection_timeout_secs));

        map.insert("logging.level".to_string(), config::Value::from(self.logging.level));
        if let Some(file_path) = self.logging.file_path {
            map.insert("logging.file_path".to_string(), config::Value::from(file_path));
        }
        map.insert("logging.format".to_string(), config::Value::from(self.logging.format));

        map.insert("schedule.daily_time".to_string(), config::Value::from(self.schedule.daily_time));
        map.insert("schedule.enabled".to_string(), config::Value::from(self.schedule.enabled));
        map.insert("schedule.tick_interval_secs".to_string(), config::Value::from(self.schedule.tick_interval_secs));

        map.insert("sources.http_timeout_secs".to_string(), config::Value::from(self.sources.http_timeout_secs));
        map.insert("sources.max_results_per_source".to_string(), config::Value::from(self.sources.max_results_per_source as u64));
        map.insert("sources.linkedin.enabled".to_string(), config::Value::from(self.sources.linkedin.enabled));
        map.insert("sources.linkedin.base_url".to_string(), config::Value::from(self.sources.linkedin.base_url));
        map.insert("sources.jobs_api.enabled".to_string(), config::Value::from(self.sources.jobs_api.enabled));
        map.insert("sources.jobs_api.host".to_string(), config::Value::from(self.sources.jobs_api.host));
        if let Some(api_key) = self.sources.jobs_api.api_key {
            map.insert("sources.jobs_api.api_key".to_string(), config::Value::from(api_key));
        }

        if let Some(token) = self.telegram.token {
            map.insert("telegram.token".to_string(), config::Value::from(token));
        }
        map.insert("telegram.poll_timeout_secs".to_string(), config::Value::from(self.telegram.poll_timeout_secs));

        map.into_iter()
    }
}
