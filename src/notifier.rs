//! Outbound delivery seam and message rendering.
//!
//! The core never talks to a transport directly; anything that can push a
//! text message to a user satisfies [`Notifier`].

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{JobPosting, UserId};

/// Fixed reply when a search turns up nothing new
pub const NO_NEW_JOBS_MESSAGE: &str =
    "No new remote entry-level jobs found based on your filters.";

/// Delivers rendered messages to users over some chat transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one text message to a user
    async fn send(&self, user: UserId, text: &str) -> Result<()>;
}

/// Render new jobs for delivery: one `"{title} - {company}\n{link}"` pair per
/// job, jobs separated by a blank line.
#[must_use]
pub fn format_jobs(jobs: &[JobPosting]) -> String {
    jobs.iter()
        .map(|job| format!("{} - {}\n{}", job.title, job.company, job.link))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_jobs() {
        let jobs = vec![
            JobPosting::new("Backend Dev", "Acme", "l1"),
            JobPosting::new("Support", "Beta", "l2"),
        ];
        assert_eq!(
            format_jobs(&jobs),
            "Backend Dev - Acme\nl1\n\nSupport - Beta\nl2"
        );
    }

    #[test]
    fn test_format_single_job_has_no_separator() {
        let jobs = vec![JobPosting::new("Backend Dev", "Acme", "l1")];
        assert_eq!(format_jobs(&jobs), "Backend Dev - Acme\nl1");
    }
}
