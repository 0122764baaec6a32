use sqlx::SqlitePool;

const SCHEMA: &str = include_str!("../../db/schema.sql");

/// Apply the embedded schema. Every statement is idempotent, so this runs on
/// every startup and in the test setup.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
