use sqlx::SqlitePool;

use crate::models::EventSettingsRow;
use crate::services::category_rules::EventDay;

const SQL_LOAD_EVENT_SETTINGS: &str = r#"
SELECT
  day1_enabled,
  day2_enabled,
  updated_at
FROM event_settings
WHERE id = 1
"#;

pub async fn load_event_settings(pool: &SqlitePool) -> sqlx::Result<EventSettingsRow> {
    sqlx::query_as::<_, EventSettingsRow>(SQL_LOAD_EVENT_SETTINGS)
        .fetch_one(pool)
        .await
}

const SQL_SET_DAY1_ENABLED: &str = r#"
UPDATE event_settings
SET day1_enabled = ?, updated_at = datetime('now')
WHERE id = 1
"#;

const SQL_SET_DAY2_ENABLED: &str = r#"
UPDATE event_settings
SET day2_enabled = ?, updated_at = datetime('now')
WHERE id = 1
"#;

pub async fn set_day_enabled(pool: &SqlitePool, day: EventDay, enabled: bool) -> sqlx::Result<()> {
    let sql = match day {
        EventDay::Day1 => SQL_SET_DAY1_ENABLED,
        EventDay::Day2 => SQL_SET_DAY2_ENABLED,
    };
    sqlx::query(sql)
        .bind(if enabled { 1_i64 } else { 0 })
        .execute(pool)
        .await?;
    Ok(())
}
