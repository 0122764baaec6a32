//! Decides whether a requested day-action may be applied, and applies it.
//!
//! The pre-checks in [`authorize`] produce a precise rejection reason from the
//! state a station can see. The apply step then re-enforces the decision with
//! a conditional UPDATE inside one transaction, so two stations racing on the
//! same attendee can never both record the same action: the flag write and the
//! log append commit together or not at all.

use thiserror::Error;
use uuid::Uuid;

use crate::database::{activity_log_repo, attendee_repo, event_settings_repo};
use crate::models::{AttendeeRow, EventSettingsRow};
use crate::services::category_rules::{self, AttendeeType, EventAction, EventDay};
use crate::services::recent_actions::RecentActions;

/// Why an action request was refused. Expected outcomes, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    DuplicateSubmission,
    AlreadyCompleted,
    DayClosed,
    KitAlreadyIssued,
    NotPermitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Denied(Denial),
}

#[derive(Debug, Error)]
pub enum CheckinError {
    #[error("attendee not found")]
    UnknownAttendee,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// The persisted completion flag for (action, day). A day-2 dinner flag does
/// not exist; that combination reads as never completed and is refused by the
/// permission check instead.
pub fn action_flag(attendee: &AttendeeRow, action: EventAction, day: EventDay) -> bool {
    let raw = match (day, action) {
        (EventDay::Day1, EventAction::Entrance) => attendee.day1_entrance,
        (EventDay::Day1, EventAction::Lunch) => attendee.day1_lunch,
        (EventDay::Day1, EventAction::Dinner) => attendee.day1_dinner,
        (EventDay::Day1, EventAction::Kit) => attendee.day1_kit,
        (EventDay::Day2, EventAction::Entrance) => attendee.day2_entrance,
        (EventDay::Day2, EventAction::Lunch) => attendee.day2_lunch,
        (EventDay::Day2, EventAction::Kit) => attendee.day2_kit,
        (EventDay::Day2, EventAction::Dinner) => 0,
    };
    raw != 0
}

/// Ordered checks; the first failing one wins.
pub fn authorize(
    attendee: &AttendeeRow,
    settings: &EventSettingsRow,
    action: EventAction,
    day: EventDay,
    recently_performed: bool,
) -> Result<(), Denial> {
    if recently_performed {
        return Err(Denial::DuplicateSubmission);
    }
    if action_flag(attendee, action, day) {
        return Err(Denial::AlreadyCompleted);
    }
    let day_enabled = match day {
        EventDay::Day1 => settings.day1_enabled != 0,
        EventDay::Day2 => settings.day2_enabled != 0,
    };
    if !day_enabled {
        return Err(Denial::DayClosed);
    }
    if action == EventAction::Kit && (attendee.day1_kit != 0 || attendee.day2_kit != 0) {
        return Err(Denial::KitAlreadyIssued);
    }
    let permitted = AttendeeType::parse(&attendee.attendee_type)
        .map(|t| category_rules::is_permitted(t, action, day))
        .unwrap_or(false);
    if !permitted {
        return Err(Denial::NotPermitted);
    }
    Ok(())
}

pub async fn perform_action(
    pool: &sqlx::SqlitePool,
    recent: &RecentActions,
    attendee_db_id: &str,
    action: EventAction,
    day: EventDay,
    performed_by: Option<&str>,
) -> Result<ActionOutcome, CheckinError> {
    let Some(attendee) = attendee_repo::find_by_id(pool, attendee_db_id).await? else {
        return Err(CheckinError::UnknownAttendee);
    };
    let settings = event_settings_repo::load_event_settings(pool).await?;

    let recently = recent.was_just_performed(&attendee.id, action, day);
    if let Err(denial) = authorize(&attendee, &settings, action, day, recently) {
        return Ok(ActionOutcome::Denied(denial));
    }

    let mut tx = pool.begin().await?;
    let updated = attendee_repo::mark_action_done(&mut *tx, &attendee.id, action, day).await?;
    if updated == 0 {
        // Another station committed between our read and this write.
        tx.rollback().await?;
        let denial = if action == EventAction::Kit {
            Denial::KitAlreadyIssued
        } else {
            Denial::AlreadyCompleted
        };
        return Ok(ActionOutcome::Denied(denial));
    }
    let log_id = Uuid::new_v4().to_string();
    activity_log_repo::insert_log_entry(
        &mut *tx,
        activity_log_repo::NewActivityLogEntry {
            id: &log_id,
            attendee_id: &attendee.attendee_id,
            action: action.as_str(),
            day: day.number(),
            performed_by,
        },
    )
    .await?;
    tx.commit().await?;

    recent.remember(&attendee.id, action, day);
    Ok(ActionOutcome::Done)
}
