//! Narrow store interfaces for user preferences and delivery history.
//!
//! The scheduler and the command layer get these injected instead of sharing
//! an ambient database handle, which keeps them independently mockable.

use crate::error::Result;
use crate::models::{JobPosting, UserId};

/// Persists each user's current job title filter.
///
/// Writes are last-write-wins; `clear` removes the entry entirely.
pub trait PreferenceStore: Send + Sync {
    /// Overwrite the user's filter text
    fn set(&self, user: UserId, filter_text: &str) -> Result<()>;

    /// Current filter text, or `None` when no preference is set
    fn get(&self, user: UserId) -> Result<Option<String>>;

    /// Remove the user's preference; subsequent `get` returns `None`
    fn clear(&self, user: UserId) -> Result<()>;

    /// Snapshot of every (user, filter) pair, for the scheduler's fan-out
    fn list_all(&self) -> Result<Vec<(UserId, String)>>;
}

/// Persists which (user, title, company) tuples have already been delivered.
///
/// Records are never updated or expired.
pub trait HistoryStore: Send + Sync {
    /// Idempotent bulk insert; re-inserting an already-present tuple is a no-op
    fn record(&self, user: UserId, postings: &[JobPosting]) -> Result<()>;

    /// Whether a delivery record exists for (user, title, company)
    fn seen(&self, user: UserId, title: &str, company: &str) -> Result<bool>;
}
