mod common;

use chrono::{Local, TimeZone};
use std::sync::Arc;
use std::time::Duration;

use common::{RecordingNotifier, StaticSource};
use job_finder_bot::db::Database;
use job_finder_bot::models::{JobPosting, ScheduleTime, UserId};
use job_finder_bot::scheduler::{Scheduler, SchedulerPhase};
use job_finder_bot::sources::{Aggregator, JobSource};
use job_finder_bot::store::{HistoryStore, PreferenceStore};

fn build_scheduler(
    db: &Arc<Database>,
    sources: Vec<Arc<dyn JobSource>>,
    notifier: &Arc<RecordingNotifier>,
) -> Scheduler {
    Scheduler::new(
        db.clone(),
        db.clone(),
        Arc::new(Aggregator::new(sources)),
        notifier.clone(),
        Duration::from_secs(1),
    )
}

fn empty_scheduler() -> Scheduler {
    let db = Arc::new(Database::in_memory().unwrap());
    build_scheduler(&db, Vec::new(), &Arc::new(RecordingNotifier::new()))
}

#[test]
fn test_phase_transitions() {
    let scheduler = empty_scheduler();
    assert_eq!(scheduler.phase(), SchedulerPhase::Idle);

    let now = Local.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    scheduler.install_at(ScheduleTime { hour: 9, minute: 0 }, now);
    assert_eq!(scheduler.phase(), SchedulerPhase::Armed);

    let fire = Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    assert!(scheduler.check_due(fire));
    assert_eq!(scheduler.phase(), SchedulerPhase::Running);

    scheduler.finish_cycle();
    assert_eq!(scheduler.phase(), SchedulerPhase::Armed);

    scheduler.remove();
    assert_eq!(scheduler.phase(), SchedulerPhase::Idle);
    assert_eq!(scheduler.current_trigger(), None);
}

#[test]
fn test_trigger_fires_once_per_day() {
    let scheduler = empty_scheduler();
    let now = Local.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    scheduler.install_at(ScheduleTime { hour: 9, minute: 0 }, now);

    assert!(!scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 8, 59, 59).unwrap()));
    assert!(scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()));
    scheduler.finish_cycle();

    // Same day, later ticks: already advanced to tomorrow
    assert!(!scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 1).unwrap()));
    assert!(!scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 23, 59, 0).unwrap()));
    assert!(scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()));
}

#[test]
fn test_reschedule_never_fires_old_and_new_same_day() {
    let scheduler = empty_scheduler();
    let install_time = Local.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    scheduler.install_at(ScheduleTime { hour: 9, minute: 0 }, install_time);

    // Reschedule from 09:00 to 14:00 one second before the old fire time
    let reschedule_time = Local.with_ymd_and_hms(2025, 6, 1, 8, 59, 59).unwrap();
    scheduler.install_at(ScheduleTime { hour: 14, minute: 0 }, reschedule_time);

    // Old time must not fire
    assert!(!scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()));
    // New time, still ahead that day, must fire exactly once
    assert!(scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap()));
    scheduler.finish_cycle();
    assert!(!scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 14, 0, 1).unwrap()));
}

#[test]
fn test_removed_trigger_never_fires() {
    let scheduler = empty_scheduler();
    let now = Local.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    scheduler.install_at(ScheduleTime { hour: 9, minute: 0 }, now);
    scheduler.remove();

    assert!(!scheduler.check_due(Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()));
}

#[tokio::test]
async fn test_cycle_delivers_and_records() {
    let db = Arc::new(Database::in_memory().unwrap());
    let user = UserId(1);
    db.set(user, "backend").unwrap();

    let source = Arc::new(StaticSource::new(
        "static",
        vec![
            JobPosting::new("Backend Dev", "Acme", "l1"),
            JobPosting::new("Support", "Beta", "l2"),
        ],
    ));
    let notifier = Arc::new(RecordingNotifier::new());
    let scheduler = build_scheduler(&db, vec![source.clone()], &notifier);

    scheduler.run_cycle().await;

    let messages = notifier.messages_for(user);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0], "Backend Dev - Acme\nl1\n\nSupport - Beta\nl2");
    assert!(db.seen(user, "Backend Dev", "Acme").unwrap());
    assert!(db.seen(user, "Support", "Beta").unwrap());

    // Second cycle with the same source output: nothing new, nothing sent
    scheduler.run_cycle().await;
    assert_eq!(notifier.sent_count(), 1);
}

#[tokio::test]
async fn test_cycle_covers_all_users() {
    let db = Arc::new(Database::in_memory().unwrap());
    db.set(UserId(1), "backend").unwrap();
    db.set(UserId(2), "support").unwrap();

    let source = Arc::new(StaticSource::new(
        "static",
        vec![JobPosting::new("Backend Dev", "Acme", "l1")],
    ));
    let notifier = Arc::new(RecordingNotifier::new());
    let scheduler = build_scheduler(&db, vec![source], &notifier);

    scheduler.run_cycle().await;

    // Both users notified independently
    assert_eq!(notifier.messages_for(UserId(1)).len(), 1);
    assert_eq!(notifier.messages_for(UserId(2)).len(), 1);
}

#[tokio::test]
async fn test_failed_delivery_is_not_recorded() {
    let db = Arc::new(Database::in_memory().unwrap());
    let user = UserId(1);
    db.set(user, "backend").unwrap();

    let source = Arc::new(StaticSource::new(
        "static",
        vec![JobPosting::new("Backend Dev", "Acme", "l1")],
    ));
    let notifier = Arc::new(RecordingNotifier::failing());
    let scheduler = build_scheduler(&db, vec![source.clone()], &notifier);

    scheduler.run_cycle().await;

    // Send failed, so the job stays unrecorded and is retried next cycle
    assert!(!db.seen(user, "Backend Dev", "Acme").unwrap());
}

#[tokio::test]
async fn test_blank_preference_never_touches_sources() {
    let db = Arc::new(Database::in_memory().unwrap());
    // A blank filter slipped into the store must not trigger a fetch
    db.set(UserId(1), "   ").unwrap();

    let source = Arc::new(StaticSource::new("static", Vec::new()));
    let notifier = Arc::new(RecordingNotifier::new());
    let scheduler = build_scheduler(&db, vec![source.clone()], &notifier);

    scheduler.run_cycle().await;

    assert_eq!(source.call_count(), 0);
    assert_eq!(notifier.sent_count(), 0);
}
