//! Job source adapters and the aggregator that fans out to them.
//!
//! Each adapter normalizes one external provider into a list of
//! [`JobPosting`]s. Failures never cross the aggregator boundary: a failing
//! source is logged and contributes an empty list, so one broken provider
//! cannot sink a whole search.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::SourcesConfig;
use crate::error::{BotError, Result};
use crate::metrics::MetricsCollector;
use crate::models::JobPosting;

/// One external job provider, queried with a free-text filter string.
///
/// `fetch` returns postings in provider order, capped per call; the cap is a
/// per-call truncation applied after provider-side ordering, not a global
/// budget.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Short provider name, used for logging and metrics labels
    fn name(&self) -> &'static str;

    /// Fetch postings matching the filter text
    async fn fetch(&self, filter_text: &str) -> Result<Vec<JobPosting>>;
}

/// Scrapes the public LinkedIn jobs search page (remote, entry-level).
pub struct LinkedInSource {
    client: Client,
    base_url: String,
    timeout: Duration,
    max_results: usize,
    title_re: Regex,
    company_re: Regex,
    link_re: Regex,
}

impl LinkedInSource {
    pub fn new(base_url: &str, timeout: Duration, max_results: usize) -> Result<Self> {
        let regex = |pattern: &str| {
            Regex::new(pattern).map_err(|e| BotError::Other(format!("bad card pattern: {e}")))
        };
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_results,
            // Guest search results render one job-search-card block per
            // posting; title, company and link each appear exactly once per
            // card and in card order, so the three capture streams zip up.
            title_re: regex(r#"(?s)<h3 class="base-search-card__title[^"]*">\s*(.*?)\s*</h3>"#)?,
            company_re: regex(
                r#"(?s)<h4 class="base-search-card__subtitle[^"]*">\s*<a[^>]*>\s*(.*?)\s*</a>"#,
            )?,
            link_re: regex(r#"<a class="base-card__full-link[^"]*"\s+href="([^"]+)""#)?,
        })
    }

    fn search_url(&self, filter_text: &str) -> String {
        // f_E=2 entry level, f_TP=1 posted past 24h
        format!(
            "{}?f_E=2&f_TP=1&keywords={}%20remote&location=Worldwide",
            self.base_url,
            urlencoding::encode(filter_text)
        )
    }

    fn parse_job_cards(&self, body: &str) -> Vec<JobPosting> {
        let titles = self.title_re.captures_iter(body).map(|c| c[1].trim().to_string());
        let companies = self.company_re.captures_iter(body).map(|c| c[1].trim().to_string());
        let links = self.link_re.captures_iter(body).map(|c| c[1].trim().to_string());

        titles
            .zip(companies)
            .zip(links)
            .map(|((title, company), link)| JobPosting::new(title, company, link))
            .take(self.max_results)
            .collect()
    }
}

#[async_trait]
impl JobSource for LinkedInSource {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    async fn fetch(&self, filter_text: &str) -> Result<Vec<JobPosting>> {
        let url = self.search_url(filter_text);
        info!(source = self.name(), %url, "Fetching job listings");

        let unavailable = |reason: String| BotError::SourceUnavailable {
            source_name: "linkedin",
            reason,
        };

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| unavailable(e.to_string()))?;

        let body = response.text().await.map_err(|e| unavailable(e.to_string()))?;
        let jobs = self.parse_job_cards(&body);
        info!(source = self.name(), count = jobs.len(), "Parsed job cards");
        Ok(jobs)
    }
}

/// Queries the RapidAPI jobs endpoint.
///
/// Constructed without an API key it degrades to always-empty with a logged
/// warning instead of failing the process.
pub struct JobsApiSource {
    client: Client,
    host: String,
    api_key: Option<String>,
    timeout: Duration,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    jobs: Vec<ApiJob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiJob {
    title: String,
    company: String,
    location: Option<String>,
    salary_range: Option<String>,
    #[serde(default)]
    job_providers: Vec<ApiJobProvider>,
}

#[derive(Debug, Deserialize)]
struct ApiJobProvider {
    url: String,
}

impl JobsApiSource {
    pub fn new(
        host: &str,
        api_key: Option<String>,
        timeout: Duration,
        max_results: usize,
    ) -> Self {
        if api_key.is_none() {
            warn!(
                source = "jobs_api",
                "No RapidAPI key configured; this source will always return no jobs"
            );
        }
        Self {
            client: Client::new(),
            host: host.to_string(),
            api_key,
            timeout,
            max_results,
        }
    }
}

#[async_trait]
impl JobSource for JobsApiSource {
    fn name(&self) -> &'static str {
        "jobs_api"
    }

    async fn fetch(&self, filter_text: &str) -> Result<Vec<JobPosting>> {
        let Some(api_key) = &self.api_key else {
            warn!(source = self.name(), "Skipping fetch: no API key configured");
            return Ok(Vec::new());
        };

        let url = format!("https://{}/list", self.host);
        info!(source = self.name(), query = filter_text, "Fetching job listings");

        let unavailable = |reason: String| BotError::SourceUnavailable {
            source_name: "jobs_api",
            reason,
        };

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", filter_text),
                ("location", "world wide"),
                ("remoteOnly", "true"),
            ])
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", &self.host)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| unavailable(e.to_string()))?;

        let data: ApiResponse = response.json().await.map_err(|e| unavailable(e.to_string()))?;

        let jobs: Vec<JobPosting> = data
            .jobs
            .into_iter()
            .map(|job| JobPosting {
                title: job.title,
                company: job.company,
                link: job
                    .job_providers
                    .first()
                    .map_or_else(|| "No URL".to_string(), |p| p.url.clone()),
                location: job.location,
                salary: job.salary_range,
            })
            .take(self.max_results)
            .collect();

        info!(source = self.name(), count = jobs.len(), "Parsed API jobs");
        Ok(jobs)
    }
}

/// Fans a filter string out to all registered sources and concatenates the
/// results, preserving source order and within-source order. Cross-source
/// duplicates are left for the novelty filter's identity rule to collapse.
pub struct Aggregator {
    sources: Vec<Arc<dyn JobSource>>,
    metrics: MetricsCollector,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn JobSource>>) -> Self {
        Self {
            sources,
            metrics: MetricsCollector::default(),
        }
    }

    /// Build the production aggregator from config: scraper first, API second
    pub fn from_config(config: &SourcesConfig, rapid_api_key: Option<String>) -> Result<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);
        let mut sources: Vec<Arc<dyn JobSource>> = Vec::new();

        if config.linkedin.enabled {
            sources.push(Arc::new(LinkedInSource::new(
                &config.linkedin.base_url,
                timeout,
                config.max_results_per_source,
            )?));
        }

        if config.jobs_api.enabled {
            sources.push(Arc::new(JobsApiSource::new(
                &config.jobs_api.host,
                rapid_api_key,
                timeout,
                config.max_results_per_source,
            )));
        }

        Ok(Self::new(sources))
    }

    /// Query every source, concatenating whatever succeeds.
    ///
    /// A failing source is logged and skipped; it never fails the search.
    pub async fn search(&self, filter_text: &str) -> Vec<JobPosting> {
        let mut all_jobs = Vec::new();

        for source in &self.sources {
            match source.fetch(filter_text).await {
                Ok(jobs) => {
                    self.metrics.record_fetch(source.name(), jobs.len());
                    all_jobs.extend(jobs);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Job source unavailable, skipping");
                    self.metrics.record_source_failure(source.name());
                }
            }
        }

        all_jobs
    }
}
