//! Inbound command semantics, independent of any chat transport.
//!
//! Maps user actions onto the preference store, aggregator, novelty filter,
//! history store, and scheduler; every reply goes out through the injected
//! [`Notifier`].

use std::sync::Arc;
use tracing::{error, info};

use crate::error::{BotError, Result};
use crate::logging::OperationTimer;
use crate::models::{ScheduleTime, UserId};
use crate::notifier::{format_jobs, Notifier, NO_NEW_JOBS_MESSAGE};
use crate::novelty::filter_new;
use crate::scheduler::Scheduler;
use crate::sources::Aggregator;
use crate::store::{HistoryStore, PreferenceStore};
use crate::validation::InputValidator;

const WELCOME_MESSAGE: &str = "Welcome to the Remote Entry-Level Job Finder Bot!\nUse /set_filters to configure your job title.";
const NO_FILTERS_MESSAGE: &str =
    "Please set your job title using /set_filters before searching for jobs.";

/// Command layer over the notification pipeline.
pub struct BotService {
    prefs: Arc<dyn PreferenceStore>,
    history: Arc<dyn HistoryStore>,
    aggregator: Arc<Aggregator>,
    scheduler: Arc<Scheduler>,
    notifier: Arc<dyn Notifier>,
}

impl BotService {
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        history: Arc<dyn HistoryStore>,
        aggregator: Arc<Aggregator>,
        scheduler: Arc<Scheduler>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            prefs,
            history,
            aggregator,
            scheduler,
            notifier,
        }
    }

    /// `/start` — greet the user
    pub async fn start(&self, user: UserId) -> Result<()> {
        info!(%user, "User started the bot");
        self.notifier.send(user, WELCOME_MESSAGE).await
    }

    /// Set the user's job title filter (last-write-wins).
    ///
    /// Empty or malformed text is rejected with a user-visible reply and no
    /// state mutation.
    pub async fn set_filters(&self, user: UserId, filter_text: &str) -> Result<()> {
        let filter_text = filter_text.trim();
        match InputValidator::validate_filter_text(filter_text) {
            Ok(()) => {}
            Err(BotError::InvalidInput(reason)) => {
                return self
                    .notifier
                    .send(user, &format!("Cannot set filters: {reason}"))
                    .await;
            }
            Err(e) => return Err(e),
        }

        self.prefs.set(user, filter_text)?;
        info!(%user, filters = filter_text, "User set filters");
        self.notifier
            .send(user, &format!("Job title filters have been set to: {filter_text}"))
            .await
    }

    /// Clear the user's stored filter
    pub async fn clear_filters(&self, user: UserId) -> Result<()> {
        self.prefs.clear(user)?;
        info!(%user, "User cleared filters");
        self.notifier.send(user, "Job title filters cleared.").await
    }

    /// On-demand search, bypassing the schedule: aggregate, filter for
    /// novelty, deliver, then record. Recording only follows a successful
    /// send, same as the scheduled path.
    pub async fn search(&self, user: UserId) -> Result<()> {
        let _timer = OperationTimer::new("on_demand_search");
        info!(%user, "User initiated a job search");

        let Some(filter_text) = self.prefs.get(user)? else {
            info!(%user, "No filters set");
            return self.notifier.send(user, NO_FILTERS_MESSAGE).await;
        };

        let postings = self.aggregator.search(&filter_text).await;
        let new_jobs = filter_new(self.history.as_ref(), user, &postings)?;

        if new_jobs.is_empty() {
            info!(%user, "No new jobs found");
            return self.notifier.send(user, NO_NEW_JOBS_MESSAGE).await;
        }

        info!(%user, count = new_jobs.len(), "Found new jobs");
        self.notifier.send(user, &format_jobs(&new_jobs)).await?;

        if let Err(e) = self.history.record(user, &new_jobs) {
            error!(
                %user,
                error = %e,
                "Failed to record delivered jobs; they may be delivered again"
            );
            return Err(e);
        }
        Ok(())
    }

    /// Set the daily alert time from an `HH:MM` argument.
    ///
    /// Malformed input is rejected without touching the schedule.
    pub async fn set_schedule(&self, user: UserId, time_arg: &str) -> Result<()> {
        match time_arg.parse::<ScheduleTime>() {
            Ok(time) => {
                self.scheduler.install(time);
                self.notifier
                    .send(user, &format!("Daily job alerts scheduled for {time}."))
                    .await
            }
            Err(BotError::InvalidInput(reason)) => {
                self.notifier
                    .send(user, &format!("Cannot set schedule: {reason}"))
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Disable the daily schedule entirely
    pub async fn remove_schedule(&self, user: UserId) -> Result<()> {
        self.scheduler.remove();
        self.notifier.send(user, "Daily job alerts disabled.").await
    }
}
