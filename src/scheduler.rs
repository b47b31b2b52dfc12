//! Recurring daily alert scheduler.
//!
//! Owns a single trigger (wall-clock time of day) guarded by one mutex
//! together with the phase state, so rescheduling is atomic with respect to
//! the firing check: there is no window where the old and new times could
//! both fire, and none where a still-upcoming time is lost.
//!
//! The tick loop polls once per configured interval (default one second).
//! Each firing runs one cycle: snapshot all stored preferences, then per
//! user fetch, filter for novelty, deliver, and record. A failure for one
//! user is logged and skipped; it never aborts the rest of the cycle.

use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::ScheduleTime;
use crate::notifier::{format_jobs, Notifier};
use crate::novelty::filter_new;
use crate::sources::Aggregator;
use crate::store::{HistoryStore, PreferenceStore};

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No trigger installed
    Idle,
    /// Trigger installed, waiting for its fire time
    Armed,
    /// A full cycle is in progress
    Running,
}

struct Trigger {
    time: ScheduleTime,
    next_fire: DateTime<Local>,
}

struct TriggerState {
    trigger: Option<Trigger>,
    phase: SchedulerPhase,
}

/// Drives the recurring fetch-filter-deliver cycle for all users.
pub struct Scheduler {
    state: Mutex<TriggerState>,
    prefs: Arc<dyn PreferenceStore>,
    history: Arc<dyn HistoryStore>,
    aggregator: Arc<Aggregator>,
    notifier: Arc<dyn Notifier>,
    tick_interval: Duration,
    metrics: MetricsCollector,
}

impl Scheduler {
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        history: Arc<dyn HistoryStore>,
        aggregator: Arc<Aggregator>,
        notifier: Arc<dyn Notifier>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            state: Mutex::new(TriggerState {
                trigger: None,
                phase: SchedulerPhase::Idle,
            }),
            prefs,
            history,
            aggregator,
            notifier,
            tick_interval,
            metrics: MetricsCollector::default(),
        }
    }

    /// Install or replace the daily trigger, next firing computed from now
    pub fn install(&self, time: ScheduleTime) {
        self.install_at(time, Local::now());
    }

    /// Install or replace the daily trigger relative to an explicit clock.
    ///
    /// Replacing takes the same lock as the firing check, so a reschedule
    /// happens strictly before or strictly after any tick.
    pub fn install_at(&self, time: ScheduleTime, now: DateTime<Local>) {
        let mut state = self.lock_state();
        let next_fire = time.next_occurrence(now);
        let previous = state.trigger.take().map(|t| t.time);
        state.trigger = Some(Trigger { time, next_fire });
        if state.phase != SchedulerPhase::Running {
            state.phase = SchedulerPhase::Armed;
        }
        match previous {
            Some(old) => info!(%old, new = %time, %next_fire, "Rescheduled daily alerts"),
            None => info!(%time, %next_fire, "Armed daily alerts"),
        }
    }

    /// Deactivate the trigger; the scheduler returns to `Idle`.
    ///
    /// A cycle already in flight finishes; there is no mid-cycle abort.
    pub fn remove(&self) {
        let mut state = self.lock_state();
        if state.trigger.take().is_some() {
            info!("Removed daily alert schedule");
        }
        if state.phase != SchedulerPhase::Running {
            state.phase = SchedulerPhase::Idle;
        }
    }

    /// Currently installed trigger time, if any
    pub fn current_trigger(&self) -> Option<ScheduleTime> {
        self.lock_state().trigger.as_ref().map(|t| t.time)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SchedulerPhase {
        self.lock_state().phase
    }

    /// Atomic firing check: when the trigger is due at `now`, advance it to
    /// its next occurrence, enter `Running`, and return true. Exactly one
    /// caller observes any given due instant.
    pub fn check_due(&self, now: DateTime<Local>) -> bool {
        let mut state = self.lock_state();
        let Some(trigger) = state.trigger.as_mut() else {
            return false;
        };
        if now < trigger.next_fire {
            return false;
        }
        trigger.next_fire = trigger.time.next_occurrence(now);
        state.phase = SchedulerPhase::Running;
        true
    }

    /// Leave `Running` once a cycle completes
    pub fn finish_cycle(&self) {
        let mut state = self.lock_state();
        state.phase = if state.trigger.is_some() {
            SchedulerPhase::Armed
        } else {
            SchedulerPhase::Idle
        };
    }

    /// Spawn the tick loop on the current tokio runtime
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(scheduler.tick_interval).await;
                if scheduler.check_due(Local::now()) {
                    scheduler.run_cycle().await;
                    scheduler.finish_cycle();
                }
            }
        })
    }

    /// One full pass over all users with a stored preference.
    ///
    /// Per user: aggregate sources, filter for novelty, deliver, record.
    /// Recording only happens after a successful send; a record failure
    /// after a successful send means the jobs may be sent again next cycle,
    /// which is accepted and logged at error level.
    pub async fn run_cycle(&self) {
        let timer = OperationTimer::new("scheduled_cycle");
        let started = std::time::Instant::now();

        let users = match self.prefs.list_all() {
            Ok(users) => users,
            Err(e) => {
                error!(error = %e, "Failed to snapshot user preferences; skipping cycle");
                self.metrics.record_store_error("list_all");
                return;
            }
        };
        info!(user_count = users.len(), "Starting scheduled alert cycle");

        for (user, filter_text) in &users {
            let user = *user;
            if filter_text.trim().is_empty() {
                // No usable preference, no source calls
                continue;
            }

            let postings = self.aggregator.search(filter_text).await;
            let new_jobs = match filter_new(self.history.as_ref(), user, &postings) {
                Ok(jobs) => jobs,
                Err(e) => {
                    error!(%user, error = %e, "Novelty check failed; skipping user");
                    self.metrics.record_store_error("seen");
                    continue;
                }
            };

            if new_jobs.is_empty() {
                debug!(%user, "No new jobs this cycle");
                continue;
            }

            let message = format_jobs(&new_jobs);
            match self.notifier.send(user, &message).await {
                Ok(()) => {
                    info!(%user, count = new_jobs.len(), "Delivered new jobs");
                    self.metrics.record_delivery(new_jobs.len());
                    if let Err(e) = self.history.record(user, &new_jobs) {
                        error!(
                            %user,
                            error = %e,
                            "Failed to record delivered jobs; they may be delivered again next cycle"
                        );
                        self.metrics.record_store_error("record");
                    }
                }
                Err(e) => {
                    // Nothing recorded for this user: next cycle retries by re-fetching
                    warn!(%user, error = %e, "Delivery failed; skipping user");
                    self.metrics.record_delivery_failure();
                }
            }
        }

        self.metrics.record_cycle(users.len(), started.elapsed());
        timer.finish();
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, TriggerState> {
        // Held only for field updates; a poisoned lock means a panic mid
        // update, and the trigger state is still consistent field-wise
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
