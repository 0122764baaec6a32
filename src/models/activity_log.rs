#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityLogRow {
    pub id: String,
    pub attendee_id: String,
    pub action: String,
    pub day: i64,
    pub performed_by: Option<String>,
    pub timestamp: String,
}
