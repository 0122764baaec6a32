use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::category_rules::AttendeeType;
use crate::services::registration_service::{self, NewRegistration, RegistrationError};
use crate::web::middleware::auth::AuthenticatedUser;

pub struct TypeOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub qr_code: String,
    pub type_options: Vec<TypeOptionView>,
    pub notice_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RegisterQuery {
    pub qr_code: Option<String>,
    pub attendee_type: Option<String>,
    pub notice: Option<String>,
}

pub async fn register_page(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<RegisterQuery>,
) -> Html<String> {
    let selected = query
        .attendee_type
        .as_deref()
        .and_then(AttendeeType::parse)
        .unwrap_or(AttendeeType::Alumni);

    let template = RegisterTemplate {
        qr_code: query.qr_code.unwrap_or_default(),
        type_options: type_options(selected),
        notice_message: query.notice.as_deref().and_then(notice_message),
    };
    Html(template.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub qr_code: String,
    pub attendee_type: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub async fn register_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<RegisterForm>,
) -> impl IntoResponse {
    let result = registration_service::register_attendee(
        &pool,
        NewRegistration {
            qr_code: &form.qr_code,
            attendee_type: &form.attendee_type,
            name: &form.name,
            email: &form.email,
            phone: &form.phone,
        },
    )
    .await;

    match result {
        Ok(attendee) => {
            Redirect::to(&format!("/attendees/{}?notice=registered", attendee.id)).into_response()
        }
        Err(RegistrationError::EmptyScanCode) => {
            Redirect::to("/scanner?notice=empty_code").into_response()
        }
        Err(RegistrationError::InvalidCategory(_)) => Redirect::to(&format!(
            "/register?qr_code={}&notice=invalid_type",
            form.qr_code.trim()
        ))
        .into_response(),
        Err(RegistrationError::DuplicateScanCode) => Redirect::to(&format!(
            "/register?qr_code={}&notice=duplicate_code",
            form.qr_code.trim()
        ))
        .into_response(),
        Err(e) => {
            warn!("Registration failed: {}", e);
            Redirect::to(&format!(
                "/register?qr_code={}&notice=error",
                form.qr_code.trim()
            ))
            .into_response()
        }
    }
}

fn type_options(selected: AttendeeType) -> Vec<TypeOptionView> {
    AttendeeType::ALL
        .iter()
        .map(|t| TypeOptionView {
            value: t.as_str(),
            label: t.label(),
            selected: *t == selected,
        })
        .collect()
}

fn notice_message(code: &str) -> Option<String> {
    let msg = match code {
        "duplicate_code" => "This scan code is already registered",
        "invalid_type" => "Pick a valid attendee type",
        "error" => "Registration failed, try again",
        _ => return None,
    };
    Some(msg.to_string())
}
