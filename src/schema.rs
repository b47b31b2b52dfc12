//! Database schema definitions
//!
//! This module provides constants for table and column names used with rusqlite.

/// User filters table schema
pub mod user_filters {
    /// Table name
    pub const TABLE: &str = "user_filters";
    /// Chat id primary key column
    pub const CHAT_ID: &str = "chat_id";
    /// Free-text job title filter column
    pub const FILTERS: &str = "filters";
}

/// Job history table schema
pub mod job_history {
    /// Table name
    pub const TABLE: &str = "job_history";
    /// Primary key column
    pub const ID: &str = "id";
    /// Chat id column
    pub const CHAT_ID: &str = "chat_id";
    /// Job title column (part of the dedup identity)
    pub const JOB_TITLE: &str = "job_title";
    /// Company column (part of the dedup identity)
    pub const COMPANY: &str = "company";
    /// Job link column, stored for display only
    pub const JOB_LINK: &str = "job_link";
}
