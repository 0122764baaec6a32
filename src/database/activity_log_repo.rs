use sqlx::{Sqlite, SqlitePool};

use crate::models::ActivityLogRow;

// Append-only: inserts and reads, no update or delete.

const SQL_INSERT_LOG_ENTRY: &str = r#"
INSERT INTO activity_log (
  id,
  attendee_id,
  action,
  day,
  performed_by
) VALUES (?, ?, ?, ?, ?)
"#;

pub struct NewActivityLogEntry<'a> {
    pub id: &'a str,
    pub attendee_id: &'a str,
    pub action: &'a str,
    pub day: i64,
    pub performed_by: Option<&'a str>,
}

pub async fn insert_log_entry<'e, E>(executor: E, entry: NewActivityLogEntry<'_>) -> sqlx::Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(SQL_INSERT_LOG_ENTRY)
        .bind(entry.id)
        .bind(entry.attendee_id)
        .bind(entry.action)
        .bind(entry.day)
        .bind(entry.performed_by)
        .execute(executor)
        .await?;
    Ok(())
}

// rowid breaks ties between entries logged within the same second.
const SQL_LIST_RECENT: &str = r#"
SELECT
  id,
  attendee_id,
  action,
  day,
  performed_by,
  timestamp
FROM activity_log
ORDER BY datetime(timestamp) DESC, rowid DESC
LIMIT ?
"#;

pub async fn list_recent(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<ActivityLogRow>> {
    sqlx::query_as::<_, ActivityLogRow>(SQL_LIST_RECENT)
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_LIST_RECENT_FOR_ATTENDEE: &str = r#"
SELECT
  id,
  attendee_id,
  action,
  day,
  performed_by,
  timestamp
FROM activity_log
WHERE attendee_id = ?
ORDER BY datetime(timestamp) DESC, rowid DESC
LIMIT ?
"#;

pub async fn list_recent_for_attendee(
    pool: &SqlitePool,
    attendee_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<ActivityLogRow>> {
    sqlx::query_as::<_, ActivityLogRow>(SQL_LIST_RECENT_FOR_ATTENDEE)
        .bind(attendee_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}
