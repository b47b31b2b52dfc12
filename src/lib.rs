//! Job Finder Bot - Deduplicated Job Alert Pipeline
//!
//! A Rust library for collecting job-title preferences, querying external
//! job sources, filtering out already-delivered postings, and sending new
//! matches on a runtime-reschedulable daily schedule.
//!
//! # Features
//!
//! - Per-user job title filters with set/get/clear semantics
//! - LinkedIn scrape and jobs-API source adapters with failure isolation
//! - History-based novelty filter (each job delivered at most once per user)
//! - Daily scheduler, atomically reschedulable while running
//! - Telegram long-polling transport

/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Error types
pub mod error;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Outbound delivery trait and message rendering
pub mod notifier;
/// History-based novelty filtering
pub mod novelty;
/// Recurring alert scheduler
pub mod scheduler;
/// Database schema definitions
pub mod schema;
/// Inbound command semantics
pub mod service;
/// Job source adapters and aggregation
pub mod sources;
/// Narrow store interfaces
pub mod store;
/// Telegram transport
pub mod telegram;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use db::Database;
pub use models::{JobPosting, ScheduleTime, UserId};
pub use scheduler::{Scheduler, SchedulerPhase};
