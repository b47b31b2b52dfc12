//! Data models for job postings, users, and schedule configuration
//!
//! This module contains all data structures used throughout the application.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BotError;

/// Opaque identifier for a user, one per chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single job listing normalized from any source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// Job title
    pub title: String,
    /// Company name
    pub company: String,
    /// Canonical URL of the posting
    pub link: String,
    /// Location, when the source provides one
    pub location: Option<String>,
    /// Salary range, when the source provides one
    pub salary: Option<String>,
}

impl JobPosting {
    /// Create a posting with only the required fields
    #[must_use]
    pub fn new(title: impl Into<String>, company: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            link: link.into(),
            location: None,
            salary: None,
        }
    }

    /// Whether two postings count as the same delivered unit.
    ///
    /// Identity is (title, company) only; the link is deliberately ignored,
    /// mirroring the history table's `UNIQUE(chat_id, job_title, company)`
    /// constraint. Two postings that differ only in link collapse to one
    /// notification.
    #[must_use]
    pub fn same_posting(&self, other: &Self) -> bool {
        self.title == other.title && self.company == other.company
    }
}

/// Wall-clock time of day at which the daily alert cycle fires.
///
/// Process-wide: applies to all users uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTime {
    /// Hour of day, 0-23
    pub hour: u32,
    /// Minute, 0-59
    pub minute: u32,
}

impl ScheduleTime {
    /// Build a schedule time, validating the ranges
    pub fn new(hour: u32, minute: u32) -> Result<Self, BotError> {
        if hour > 23 || minute > 59 {
            return Err(BotError::InvalidInput(format!(
                "schedule time out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Next local wall-clock instant at which this time occurs, strictly
    /// after `now`. Falls to the next day when today's occurrence has passed
    /// (or is exactly now).
    #[must_use]
    pub fn next_occurrence(&self, now: DateTime<Local>) -> DateTime<Local> {
        // Hour/minute are range-checked on construction
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .unwrap_or(NaiveTime::MIN);
        let today = now.date_naive().and_time(time);
        let candidate = Local
            .from_local_datetime(&today)
            .earliest()
            .unwrap_or(now);
        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(1)
        }
    }
}

impl FromStr for ScheduleTime {
    type Err = BotError;

    /// Parse a 24-hour `HH:MM` string, rejecting anything malformed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BotError::InvalidInput(format!("expected HH:MM (24-hour), got '{s}'"));
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
