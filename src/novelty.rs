//! History-based novelty filter.
//!
//! The one rule that guarantees each distinct job reaches a user at most
//! once: a posting is novel iff no delivery record exists for its
//! (title, company) under that user.

use crate::error::Result;
use crate::models::{JobPosting, UserId};
use crate::store::HistoryStore;

/// Filter `postings` down to the ones not yet delivered to `user`.
///
/// Order-preserving and read-only with respect to the history snapshot.
/// Does not deduplicate within the input itself: if the aggregator yields
/// two postings with identical title+company in one batch, both pass, since
/// neither has a record yet. They collapse on the next call once recorded.
pub fn filter_new(
    history: &dyn HistoryStore,
    user: UserId,
    postings: &[JobPosting],
) -> Result<Vec<JobPosting>> {
    let mut new_jobs = Vec::new();
    for posting in postings {
        if !history.seen(user, &posting.title, &posting.company)? {
            new_jobs.push(posting.clone());
        }
    }
    Ok(new_jobs)
}
