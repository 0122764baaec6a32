use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::category_rules;
use crate::services::registration_service::{self, RegistrationError};
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Template)]
#[template(path = "scanner.html")]
pub struct ScannerTemplate {
    pub notice_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ScannerQuery {
    pub notice: Option<String>,
}

pub async fn scanner_page(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<ScannerQuery>,
) -> Html<String> {
    let template = ScannerTemplate {
        notice_message: query.notice.as_deref().and_then(notice_message),
    };
    Html(template.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct ScanForm {
    pub qr_code: String,
}

/// Resolve a scanned code: known attendee -> profile, unknown -> registration
/// form with the code and a category guess from its prefix.
pub async fn scan_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ScanForm>,
) -> impl IntoResponse {
    let code = form.qr_code.trim().to_string();
    match registration_service::resolve_scan(&pool, &code).await {
        Ok(Some(attendee)) => Redirect::to(&format!("/attendees/{}", attendee.id)).into_response(),
        Ok(None) => {
            let mut target = format!("/register?qr_code={}", code);
            if let Some(hint) = category_rules::type_for_scan_code(&code) {
                target.push_str(&format!("&attendee_type={}", hint.as_str()));
            }
            Redirect::to(&target).into_response()
        }
        Err(RegistrationError::EmptyScanCode) => {
            Redirect::to("/scanner?notice=empty_code").into_response()
        }
        Err(e) => {
            warn!("Scan resolve failed: {}", e);
            Redirect::to("/scanner?notice=error").into_response()
        }
    }
}

fn notice_message(code: &str) -> Option<String> {
    let msg = match code {
        "empty_code" => "Scan code is required",
        "admin_required" => "Admin access required",
        "error" => "Something went wrong, try again",
        _ => return None,
    };
    Some(msg.to_string())
}
