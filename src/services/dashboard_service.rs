//! Admin dashboard views: registration totals, per-action counts and the
//! searchable attendee table. Everything here is recomputed from the store on
//! each request.

use sqlx::SqlitePool;

use crate::database::{activity_log_repo, attendee_repo, event_settings_repo};
use crate::models::AttendeeRow;
use crate::services::category_rules::AttendeeType;

pub struct DashboardStatsView {
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

pub struct AttendeeTableRowView {
    pub id: String,
    pub attendee_id: String,
    pub type_label: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qr_code: String,
    pub day1_entrance: bool,
    pub day1_lunch: bool,
    pub day1_dinner: bool,
    pub day1_kit: bool,
    pub day2_entrance: bool,
    pub day2_lunch: bool,
    pub day2_kit: bool,
}

pub struct ActivityFeedEntryView {
    pub attendee_id: String,
    pub action: String,
    pub day: i64,
    pub performed_by: String,
    pub timestamp: String,
}

pub struct DashboardData {
    pub stats: DashboardStatsView,
    pub attendees: Vec<AttendeeTableRowView>,
    pub day1_enabled: bool,
    pub day2_enabled: bool,
    pub recent_activity: Vec<ActivityFeedEntryView>,
    pub search: String,
}

const ACTIVITY_FEED_LIMIT: i64 = 25;

pub async fn load_dashboard(pool: &SqlitePool, search: Option<&str>) -> sqlx::Result<DashboardData> {
    let search = search.unwrap_or_default().trim().to_string();
    let attendees = if search.is_empty() {
        attendee_repo::list_all(pool).await?
    } else {
        let q_like = format!("%{}%", search.to_lowercase());
        attendee_repo::search(pool, &q_like).await?
    };

    let stats = attendee_repo::load_stats(pool).await?;
    let settings = event_settings_repo::load_event_settings(pool).await?;
    let recent = activity_log_repo::list_recent(pool, ACTIVITY_FEED_LIMIT).await?;

    Ok(DashboardData {
        stats: DashboardStatsView {
            total: stats.total,
            alumni: stats.alumni,
            faculty: stats.faculty,
            volunteer: stats.volunteer,
            student: stats.student,
            press: stats.press,
            other: stats.other,
            day1_entrance: stats.day1_entrance,
            day1_lunch: stats.day1_lunch,
            day1_dinner: stats.day1_dinner,
            day2_entrance: stats.day2_entrance,
            day2_lunch: stats.day2_lunch,
            kits: stats.kits,
        },
        attendees: attendees.into_iter().map(build_table_row).collect(),
        day1_enabled: settings.day1_enabled != 0,
        day2_enabled: settings.day2_enabled != 0,
        recent_activity: recent
            .into_iter()
            .map(|row| ActivityFeedEntryView {
                attendee_id: row.attendee_id,
                action: row.action,
                day: row.day,
                performed_by: row.performed_by.unwrap_or_default(),
                timestamp: row.timestamp,
            })
            .collect(),
        search,
    })
}

fn build_table_row(row: AttendeeRow) -> AttendeeTableRowView {
    let type_label = AttendeeType::parse(&row.attendee_type)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| row.attendee_type.clone());
    AttendeeTableRowView {
        id: row.id,
        attendee_id: row.attendee_id,
        type_label,
        name: row.name,
        email: row.email,
        phone: row.phone,
        qr_code: row.qr_code,
        day1_entrance: row.day1_entrance != 0,
        day1_lunch: row.day1_lunch != 0,
        day1_dinner: row.day1_dinner != 0,
        day1_kit: row.day1_kit != 0,
        day2_entrance: row.day2_entrance != 0,
        day2_lunch: row.day2_lunch != 0,
        day2_kit: row.day2_kit != 0,
    }
}

/// CSV of every attendee, same column set the event office worked with before.
pub async fn export_attendees_csv(pool: &SqlitePool) -> sqlx::Result<String> {
    let attendees = attendee_repo::list_all(pool).await?;

    let mut out = String::from(
        "Attendee ID,Type,Name,Email,Phone,QR Code,Day1 Entrance,Day1 Lunch,Day1 Dinner,Day1 Kit,Day2 Entrance,Day2 Lunch,Day2 Kit\n",
    );
    for a in attendees {
        let fields = [
            a.attendee_id.as_str(),
            a.attendee_type.as_str(),
            a.name.as_str(),
            a.email.as_str(),
            a.phone.as_str(),
            a.qr_code.as_str(),
            yes_no(a.day1_entrance),
            yes_no(a.day1_lunch),
            yes_no(a.day1_dinner),
            yes_no(a.day1_kit),
            yes_no(a.day2_entrance),
            yes_no(a.day2_lunch),
            yes_no(a.day2_kit),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    Ok(out)
}

fn yes_no(flag: i64) -> &'static str {
    if flag != 0 {
        "Yes"
    } else {
        "No"
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_fields_escape_commas_and_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("Doe, John"), "\"Doe, John\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
