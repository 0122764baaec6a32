use sqlx::SqlitePool;

const SQL_HAS_ADMIN_ROLE: &str = r#"
SELECT COUNT(*)
FROM user_roles
WHERE user_id = ? AND role = 'admin'
"#;

pub async fn has_admin_role(pool: &SqlitePool, user_id: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_HAS_ADMIN_ROLE)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}
