//! Shared test doubles for the source and delivery seams.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use job_finder_bot::error::{BotError, Result};
use job_finder_bot::models::{JobPosting, UserId};
use job_finder_bot::notifier::Notifier;
use job_finder_bot::sources::JobSource;

/// Job source returning a fixed list (or a fixed failure) and counting calls.
pub struct StaticSource {
    pub source_name: &'static str,
    pub jobs: Vec<JobPosting>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(source_name: &'static str, jobs: Vec<JobPosting>) -> Self {
        Self {
            source_name,
            jobs,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(source_name: &'static str) -> Self {
        Self {
            source_name,
            jobs: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobSource for StaticSource {
    fn name(&self) -> &'static str {
        self.source_name
    }

    async fn fetch(&self, _filter_text: &str) -> Result<Vec<JobPosting>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(BotError::SourceUnavailable {
                source_name: self.source_name,
                reason: "simulated outage".to_string(),
            })
        } else {
            Ok(self.jobs.clone())
        }
    }
}

/// Notifier capturing every sent message, optionally failing each send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(UserId, String)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages_for(&self, user: UserId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, user: UserId, text: &str) -> Result<()> {
        if self.fail {
            return Err(BotError::Delivery("simulated transport error".to_string()));
        }
        self.sent.lock().unwrap().push((user, text.to_string()));
        Ok(())
    }
}
