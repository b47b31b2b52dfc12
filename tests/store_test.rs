use tempfile::tempdir;

use job_finder_bot::db::Database;
use job_finder_bot::models::{JobPosting, UserId};
use job_finder_bot::store::{HistoryStore, PreferenceStore};

#[test]
fn test_database_creation_on_disk() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("data").join("test.db");

    let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
    let _conn = db.get_connection().expect("Failed to get database connection");
    assert!(db_path.exists());
}

#[test]
fn test_preference_set_get_clear() {
    let db = Database::in_memory().expect("Failed to create database");
    let user = UserId(42);

    assert_eq!(db.get(user).unwrap(), None);

    db.set(user, "Backend Developer").unwrap();
    assert_eq!(db.get(user).unwrap(), Some("Backend Developer".to_string()));

    // Last write wins
    db.set(user, "Data Engineer").unwrap();
    assert_eq!(db.get(user).unwrap(), Some("Data Engineer".to_string()));

    db.clear(user).unwrap();
    assert_eq!(db.get(user).unwrap(), None);
}

#[test]
fn test_preferences_are_independent_across_users() {
    let db = Database::in_memory().expect("Failed to create database");

    db.set(UserId(1), "rust").unwrap();
    db.set(UserId(2), "python").unwrap();
    db.clear(UserId(1)).unwrap();

    assert_eq!(db.get(UserId(1)).unwrap(), None);
    assert_eq!(db.get(UserId(2)).unwrap(), Some("python".to_string()));
}

#[test]
fn test_list_all_preferences() {
    let db = Database::in_memory().expect("Failed to create database");

    db.set(UserId(2), "python").unwrap();
    db.set(UserId(1), "rust").unwrap();

    let all = db.list_all().unwrap();
    assert_eq!(
        all,
        vec![
            (UserId(1), "rust".to_string()),
            (UserId(2), "python".to_string()),
        ]
    );
}

#[test]
fn test_record_is_idempotent() {
    let db = Database::in_memory().expect("Failed to create database");
    let user = UserId(7);
    let job = JobPosting::new("Backend Dev", "Acme", "l1");

    db.record(user, std::slice::from_ref(&job)).unwrap();
    db.record(user, std::slice::from_ref(&job)).unwrap();

    let conn = db.get_connection().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM job_history WHERE chat_id = ? AND job_title = ? AND company = ?",
            rusqlite::params![user.0, "Backend Dev", "Acme"],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_seen_matches_on_title_and_company_only() {
    let db = Database::in_memory().expect("Failed to create database");
    let user = UserId(7);

    db.record(user, &[JobPosting::new("Backend Dev", "Acme", "linkA")])
        .unwrap();

    // Different link, same identity
    assert!(db.seen(user, "Backend Dev", "Acme").unwrap());
    // Different company is a different posting
    assert!(!db.seen(user, "Backend Dev", "Beta").unwrap());
    // History is per user
    assert!(!db.seen(UserId(8), "Backend Dev", "Acme").unwrap());
}
