use sqlx::{Sqlite, SqlitePool};

use crate::models::AttendeeRow;
use crate::services::category_rules::{EventAction, EventDay};

const SQL_FIND_BY_QR_CODE: &str = r#"
SELECT
  id,
  attendee_id,
  attendee_type,
  name,
  email,
  phone,
  qr_code,
  day1_entrance,
  day1_lunch,
  day1_dinner,
  day1_kit,
  day2_entrance,
  day2_lunch,
  day2_kit,
  created_at
FROM attendees
WHERE qr_code = ?
"#;

pub async fn find_by_qr_code(pool: &SqlitePool, qr_code: &str) -> sqlx::Result<Option<AttendeeRow>> {
    sqlx::query_as::<_, AttendeeRow>(SQL_FIND_BY_QR_CODE)
        .bind(qr_code)
        .fetch_optional(pool)
        .await
}

const SQL_FIND_BY_ID: &str = r#"
SELECT
  id,
  attendee_id,
  attendee_type,
  name,
  email,
  phone,
  qr_code,
  day1_entrance,
  day1_lunch,
  day1_dinner,
  day1_kit,
  day2_entrance,
  day2_lunch,
  day2_kit,
  created_at
FROM attendees
WHERE id = ?
"#;

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<AttendeeRow>> {
    sqlx::query_as::<_, AttendeeRow>(SQL_FIND_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_ATTENDEE: &str = r#"
INSERT INTO attendees (
  id,
  attendee_id,
  attendee_type,
  name,
  email,
  phone,
  qr_code
) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub struct NewAttendee<'a> {
    pub id: &'a str,
    pub attendee_id: &'a str,
    pub attendee_type: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub qr_code: &'a str,
}

pub async fn insert_attendee(pool: &SqlitePool, attendee: NewAttendee<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_ATTENDEE)
        .bind(attendee.id)
        .bind(attendee.attendee_id)
        .bind(attendee.attendee_type)
        .bind(attendee.name)
        .bind(attendee.email)
        .bind(attendee.phone)
        .bind(attendee.qr_code)
        .execute(pool)
        .await?;
    Ok(())
}

// Conditional updates: the WHERE clause re-checks the flag so that of two
// stations racing past the pre-checks, exactly one matches a row. The loser
// sees rows_affected == 0 and must report the action as already done.
// Kit additionally re-checks both days; it is a single entitlement.
const SQL_MARK_DAY1_ENTRANCE: &str =
    "UPDATE attendees SET day1_entrance = 1 WHERE id = ? AND day1_entrance = 0";
const SQL_MARK_DAY1_LUNCH: &str =
    "UPDATE attendees SET day1_lunch = 1 WHERE id = ? AND day1_lunch = 0";
const SQL_MARK_DAY1_DINNER: &str =
    "UPDATE attendees SET day1_dinner = 1 WHERE id = ? AND day1_dinner = 0";
const SQL_MARK_DAY1_KIT: &str =
    "UPDATE attendees SET day1_kit = 1 WHERE id = ? AND day1_kit = 0 AND day2_kit = 0";
const SQL_MARK_DAY2_ENTRANCE: &str =
    "UPDATE attendees SET day2_entrance = 1 WHERE id = ? AND day2_entrance = 0";
const SQL_MARK_DAY2_LUNCH: &str =
    "UPDATE attendees SET day2_lunch = 1 WHERE id = ? AND day2_lunch = 0";
const SQL_MARK_DAY2_KIT: &str =
    "UPDATE attendees SET day2_kit = 1 WHERE id = ? AND day1_kit = 0 AND day2_kit = 0";

fn mark_action_sql(action: EventAction, day: EventDay) -> Option<&'static str> {
    match (day, action) {
        (EventDay::Day1, EventAction::Entrance) => Some(SQL_MARK_DAY1_ENTRANCE),
        (EventDay::Day1, EventAction::Lunch) => Some(SQL_MARK_DAY1_LUNCH),
        (EventDay::Day1, EventAction::Dinner) => Some(SQL_MARK_DAY1_DINNER),
        (EventDay::Day1, EventAction::Kit) => Some(SQL_MARK_DAY1_KIT),
        (EventDay::Day2, EventAction::Entrance) => Some(SQL_MARK_DAY2_ENTRANCE),
        (EventDay::Day2, EventAction::Lunch) => Some(SQL_MARK_DAY2_LUNCH),
        (EventDay::Day2, EventAction::Kit) => Some(SQL_MARK_DAY2_KIT),
        // No day-2 dinner column exists; the permission table never lets such
        // a request reach the write step.
        (EventDay::Day2, EventAction::Dinner) => None,
    }
}

pub async fn mark_action_done<'e, E>(
    executor: E,
    id: &str,
    action: EventAction,
    day: EventDay,
) -> sqlx::Result<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let Some(sql) = mark_action_sql(action, day) else {
        return Ok(0);
    };
    let res = sqlx::query(sql).bind(id).execute(executor).await?;
    Ok(res.rows_affected())
}

const SQL_LIST_ALL: &str = r#"
SELECT
  id,
  attendee_id,
  attendee_type,
  name,
  email,
  phone,
  qr_code,
  day1_entrance,
  day1_lunch,
  day1_dinner,
  day1_kit,
  day2_entrance,
  day2_lunch,
  day2_kit,
  created_at
FROM attendees
ORDER BY datetime(created_at) DESC, attendee_id DESC
"#;

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<AttendeeRow>> {
    sqlx::query_as::<_, AttendeeRow>(SQL_LIST_ALL)
        .fetch_all(pool)
        .await
}

const SQL_SEARCH: &str = r#"
SELECT
  id,
  attendee_id,
  attendee_type,
  name,
  email,
  phone,
  qr_code,
  day1_entrance,
  day1_lunch,
  day1_dinner,
  day1_kit,
  day2_entrance,
  day2_lunch,
  day2_kit,
  created_at
FROM attendees
WHERE lower(name) LIKE ?
   OR lower(email) LIKE ?
   OR phone LIKE ?
   OR lower(attendee_id) LIKE ?
   OR lower(qr_code) LIKE ?
ORDER BY datetime(created_at) DESC, attendee_id DESC
"#;

pub async fn search(pool: &SqlitePool, q_like: &str) -> sqlx::Result<Vec<AttendeeRow>> {
    sqlx::query_as::<_, AttendeeRow>(SQL_SEARCH)
        .bind(q_like)
        .bind(q_like)
        .bind(q_like)
        .bind(q_like)
        .bind(q_like)
        .fetch_all(pool)
        .await
}

#[derive(Debug, sqlx::FromRow)]
pub struct AttendeeStatsRow {
    pub total: i64,
    pub alumni: i64,
    pub faculty: i64,
    pub volunteer: i64,
    pub student: i64,
    pub press: i64,
    pub other: i64,
    pub day1_entrance: i64,
    pub day1_lunch: i64,
    pub day1_dinner: i64,
    pub day2_entrance: i64,
    pub day2_lunch: i64,
    pub kits: i64,
}

// Dashboard counts are derived on demand; nothing aggregated is ever stored.
const SQL_LOAD_STATS: &str = r#"
SELECT
  COUNT(*) AS total,
  COALESCE(SUM(CASE WHEN attendee_type = 'alumni' THEN 1 ELSE 0 END), 0) AS alumni,
  COALESCE(SUM(CASE WHEN attendee_type = 'faculty' THEN 1 ELSE 0 END), 0) AS faculty,
  COALESCE(SUM(CASE WHEN attendee_type = 'volunteer' THEN 1 ELSE 0 END), 0) AS volunteer,
  COALESCE(SUM(CASE WHEN attendee_type = 'student' THEN 1 ELSE 0 END), 0) AS student,
  COALESCE(SUM(CASE WHEN attendee_type = 'press' THEN 1 ELSE 0 END), 0) AS press,
  COALESCE(SUM(CASE WHEN attendee_type = 'other' THEN 1 ELSE 0 END), 0) AS other,
  COALESCE(SUM(day1_entrance), 0) AS day1_entrance,
  COALESCE(SUM(day1_lunch), 0) AS day1_lunch,
  COALESCE(SUM(day1_dinner), 0) AS day1_dinner,
  COALESCE(SUM(day2_entrance), 0) AS day2_entrance,
  COALESCE(SUM(day2_lunch), 0) AS day2_lunch,
  COALESCE(SUM(CASE WHEN day1_kit = 1 OR day2_kit = 1 THEN 1 ELSE 0 END), 0) AS kits
FROM attendees
"#;

pub async fn load_stats(pool: &SqlitePool) -> sqlx::Result<AttendeeStatsRow> {
    sqlx::query_as::<_, AttendeeStatsRow>(SQL_LOAD_STATS)
        .fetch_one(pool)
        .await
}
