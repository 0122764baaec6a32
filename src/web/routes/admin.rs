use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::event_settings_repo;
use crate::services::category_rules::EventDay;
use crate::services::dashboard_service::{self, DashboardData};
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub data: DashboardData,
    pub notice_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AdminQuery {
    pub q: Option<String>,
    pub notice: Option<String>,
}

pub async fn admin_dashboard_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<AdminQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let data = match dashboard_service::load_dashboard(&pool, query.q.as_deref()).await {
        Ok(d) => d,
        Err(e) => {
            warn!("Dashboard load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = AdminTemplate {
        data,
        notice_message: query.notice.as_deref().and_then(notice_message),
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub day: i64,
    pub enabled: i64,
}

pub async fn admin_settings_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<SettingsForm>,
) -> impl IntoResponse {
    let Some(day) = EventDay::parse(form.day) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let enabled = form.enabled != 0;

    match event_settings_repo::set_day_enabled(&pool, day, enabled).await {
        Ok(()) => {
            tracing::info!(
                "Day {} {} by {}",
                day.number(),
                if enabled { "enabled" } else { "disabled" },
                auth_user.id
            );
            Redirect::to("/admin?notice=settings_saved").into_response()
        }
        Err(e) => {
            warn!("Settings update failed: {}", e);
            Redirect::to("/admin?notice=error").into_response()
        }
    }
}

pub async fn admin_export_csv_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> Response {
    match dashboard_service::export_attendees_csv(&pool).await {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"attendees.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            warn!("CSV export failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn notice_message(code: &str) -> Option<String> {
    let msg = match code {
        "settings_saved" => "Event settings updated",
        "error" => "Something went wrong, try again",
        _ => return None,
    };
    Some(msg.to_string())
}
