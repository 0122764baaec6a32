use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::{activity_log_repo, attendee_repo, event_settings_repo};
use crate::models::AttendeeRow;
use crate::services::category_rules::{self, AttendeeType, EventAction, EventDay};
use crate::services::checkin_service::{self, ActionOutcome, CheckinError, Denial};
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

pub struct ActionButtonView {
    pub action: &'static str,
    pub label: &'static str,
    pub done: bool,
    pub locked: bool,
    pub kit_taken: bool,
}

pub struct DayPanelView {
    pub day: i64,
    pub enabled: bool,
    pub buttons: Vec<ActionButtonView>,
    pub kit_taken_on_other_day: bool,
}

pub struct HistoryEntryView {
    pub action: String,
    pub day: i64,
    pub timestamp: String,
}

#[derive(Template)]
#[template(path = "attendee.html")]
pub struct AttendeeProfileTemplate {
    pub id: String,
    pub attendee_id: String,
    pub type_label: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qr_code: String,
    pub day1: DayPanelView,
    pub day2: DayPanelView,
    pub history: Vec<HistoryEntryView>,
    pub notice_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProfileQuery {
    pub notice: Option<String>,
}

const HISTORY_LIMIT: i64 = 10;

pub async fn attendee_profile_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(attendee_id): Path<String>,
    Query(query): Query<ProfileQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let attendee = match attendee_repo::find_by_id(&pool, &attendee_id).await {
        Ok(Some(a)) => a,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!("Attendee load failed for {}: {}", attendee_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let settings = match event_settings_repo::load_event_settings(&pool).await {
        Ok(s) => s,
        Err(e) => {
            warn!("Event settings load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let history = match activity_log_repo::list_recent_for_attendee(
        &pool,
        &attendee.attendee_id,
        HISTORY_LIMIT,
    )
    .await
    {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Activity history load failed for {}: {}", attendee.attendee_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let type_label = AttendeeType::parse(&attendee.attendee_type)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| attendee.attendee_type.clone());

    let template = AttendeeProfileTemplate {
        id: attendee.id.clone(),
        attendee_id: attendee.attendee_id.clone(),
        type_label,
        name: attendee.name.clone(),
        email: attendee.email.clone(),
        phone: attendee.phone.clone(),
        qr_code: attendee.qr_code.clone(),
        day1: build_day_panel(&attendee, EventDay::Day1, settings.day1_enabled != 0),
        day2: build_day_panel(&attendee, EventDay::Day2, settings.day2_enabled != 0),
        history: history
            .into_iter()
            .map(|row| HistoryEntryView {
                action: row.action,
                day: row.day,
                timestamp: row.timestamp,
            })
            .collect(),
        notice_message: query.notice.as_deref().and_then(notice_message),
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    pub action: String,
    pub day: i64,
}

pub async fn attendee_action_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(attendee_id): Path<String>,
    State(state): State<AppState>,
    Form(form): Form<ActionForm>,
) -> impl IntoResponse {
    let Some(action) = EventAction::parse(&form.action) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(day) = EventDay::parse(form.day) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let outcome = checkin_service::perform_action(
        &state.pool,
        &state.recent_actions,
        &attendee_id,
        action,
        day,
        Some(&auth_user.id),
    )
    .await;

    let notice = match outcome {
        Ok(ActionOutcome::Done) => match action {
            EventAction::Entrance => "entrance_marked",
            EventAction::Lunch => "lunch_marked",
            EventAction::Dinner => "dinner_marked",
            EventAction::Kit => "kit_marked",
        },
        Ok(ActionOutcome::Denied(denial)) => denial_notice(denial, day),
        Err(CheckinError::UnknownAttendee) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!("Action {} day {} failed for {}: {}", form.action, form.day, attendee_id, e);
            "error"
        }
    };

    Redirect::to(&format!("/attendees/{}?notice={}", attendee_id, notice)).into_response()
}

fn build_day_panel(attendee: &AttendeeRow, day: EventDay, enabled: bool) -> DayPanelView {
    let attendee_type = AttendeeType::parse(&attendee.attendee_type);
    let kit_taken = attendee.day1_kit != 0 || attendee.day2_kit != 0;
    let kit_taken_on_other_day = match day {
        EventDay::Day1 => attendee.day2_kit != 0,
        EventDay::Day2 => attendee.day1_kit != 0,
    };

    let mut buttons = Vec::new();
    if let Some(t) = attendee_type {
        for action in category_rules::permitted_actions(t, day) {
            // The other day's kit shows up as a note, not a dead button.
            if *action == EventAction::Kit && kit_taken_on_other_day {
                continue;
            }
            buttons.push(ActionButtonView {
                action: action.as_str(),
                label: action.label(),
                done: checkin_service::action_flag(attendee, *action, day),
                locked: !enabled,
                kit_taken: *action == EventAction::Kit && kit_taken,
            });
        }
    }

    DayPanelView {
        day: day.number(),
        enabled,
        buttons,
        kit_taken_on_other_day,
    }
}

fn denial_notice(denial: Denial, day: EventDay) -> &'static str {
    match denial {
        Denial::DuplicateSubmission => "duplicate_submission",
        Denial::AlreadyCompleted => "already_completed",
        Denial::DayClosed => match day {
            EventDay::Day1 => "day1_closed",
            EventDay::Day2 => "day2_closed",
        },
        Denial::KitAlreadyIssued => "kit_taken",
        Denial::NotPermitted => "not_permitted",
    }
}

fn notice_message(code: &str) -> Option<String> {
    let msg = match code {
        "registered" => "Registration complete!",
        "entrance_marked" => "Entrance marked!",
        "lunch_marked" => "Lunch marked!",
        "dinner_marked" => "Dinner marked!",
        "kit_marked" => "Kit marked!",
        "duplicate_submission" => "Action was just performed - avoiding duplicate",
        "already_completed" => "Already completed - duplicate scan blocked",
        "day1_closed" => "Day 1 actions are closed",
        "day2_closed" => "Day 2 actions are closed",
        "kit_taken" => "Kit already taken",
        "not_permitted" => "Not allowed for this attendee type",
        "error" => "Failed to update, try again",
        _ => return None,
    };
    Some(msg.to_string())
}
