//! Scan resolution and on-the-spot registration.
//!
//! Registration allocates the next sequential code for the category and then
//! inserts the attendee; the qr_code UNIQUE constraint is the arbiter when two
//! stations register the same code at once. A failed insert after allocation
//! burns the number, which is fine: numbers are never reused.

use thiserror::Error;
use uuid::Uuid;

use crate::database::{attendee_repo, counter_repo};
use crate::models::AttendeeRow;
use crate::services::category_rules::AttendeeType;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("scan code is required")]
    EmptyScanCode,
    #[error("unknown attendee type: {0}")]
    InvalidCategory(String),
    #[error("scan code is already registered")]
    DuplicateScanCode,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// Lookup only, no side effects.
pub async fn resolve_scan(
    pool: &sqlx::SqlitePool,
    code: &str,
) -> Result<Option<AttendeeRow>, RegistrationError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(RegistrationError::EmptyScanCode);
    }
    Ok(attendee_repo::find_by_qr_code(pool, code).await?)
}

pub struct NewRegistration<'a> {
    pub qr_code: &'a str,
    pub attendee_type: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

pub async fn register_attendee(
    pool: &sqlx::SqlitePool,
    registration: NewRegistration<'_>,
) -> Result<AttendeeRow, RegistrationError> {
    let qr_code = registration.qr_code.trim();
    if qr_code.is_empty() {
        return Err(RegistrationError::EmptyScanCode);
    }
    let Some(attendee_type) = AttendeeType::parse(registration.attendee_type) else {
        return Err(RegistrationError::InvalidCategory(
            registration.attendee_type.trim().to_string(),
        ));
    };

    let number = counter_repo::next_counter_value(pool, attendee_type.as_str()).await?;
    let attendee_code = format!("{}-{:03}", attendee_type.code_prefix(), number);
    let id = Uuid::new_v4().to_string();

    let inserted = attendee_repo::insert_attendee(
        pool,
        attendee_repo::NewAttendee {
            id: &id,
            attendee_id: &attendee_code,
            attendee_type: attendee_type.as_str(),
            name: registration.name.trim(),
            email: registration.email.trim(),
            phone: registration.phone.trim(),
            qr_code,
        },
    )
    .await;

    match inserted {
        Ok(()) => {}
        Err(e) if is_unique_violation(&e) => return Err(RegistrationError::DuplicateScanCode),
        Err(e) => return Err(e.into()),
    }

    let Some(attendee) = attendee_repo::find_by_id(pool, &id).await? else {
        // The row we just inserted is gone; surface it as a storage fault.
        return Err(RegistrationError::Storage(sqlx::Error::RowNotFound));
    };
    Ok(attendee)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation)
}
