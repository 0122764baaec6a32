#![allow(dead_code)]

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

use scanstation::models::AttendeeRow;
use scanstation::services::registration_service::{self, NewRegistration};

/// File-backed database so concurrent connections exercise the same store the
/// stations do. The TempDir must stay alive for the duration of the test.
pub async fn setup_pool() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("test.db"))
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .expect("connect test db");

    scanstation::database::schema::ensure_schema(&pool)
        .await
        .expect("apply schema");

    (pool, dir)
}

pub async fn register(pool: &SqlitePool, qr_code: &str, attendee_type: &str) -> AttendeeRow {
    registration_service::register_attendee(
        pool,
        NewRegistration {
            qr_code,
            attendee_type,
            name: "Test Person",
            email: "test@example.com",
            phone: "+31 6 12345678",
        },
    )
    .await
    .expect("register attendee")
}
