#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventSettingsRow {
    pub day1_enabled: i64,
    pub day2_enabled: i64,
    pub updated_at: Option<String>,
}
