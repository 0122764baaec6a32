#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendeeRow {
    pub id: String,
    pub attendee_id: String,
    pub attendee_type: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qr_code: String,
    pub day1_entrance: i64,
    pub day1_lunch: i64,
    pub day1_dinner: i64,
    pub day1_kit: i64,
    pub day2_entrance: i64,
    pub day2_lunch: i64,
    pub day2_kit: i64,
    pub created_at: String,
}
