use sqlx::SqlitePool;

// Single-statement upsert: two stations registering the same category at the
// same moment can never read the same counter value.
const SQL_NEXT_COUNTER_VALUE: &str = r#"
INSERT INTO id_counters (attendee_type, next_value)
VALUES (?, 1)
ON CONFLICT(attendee_type) DO UPDATE SET next_value = next_value + 1
RETURNING next_value
"#;

pub async fn next_counter_value(pool: &SqlitePool, attendee_type: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_NEXT_COUNTER_VALUE)
        .bind(attendee_type)
        .fetch_one(pool)
        .await
}
