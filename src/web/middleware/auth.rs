use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::user_roles_repo;

/// The operator behind this station; recorded as performed_by on every action.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
}

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
}

pub async fn require_auth(mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("access_token="))
                .and_then(|c| c.strip_prefix("access_token="))
        });

    if let Some(token) = token {
        // The auth service signed this; we only need the subject claim here.
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            if let Ok(payload_bytes) = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]) {
                if let Ok(payload) = serde_json::from_slice::<JwtPayload>(&payload_bytes) {
                    request
                        .extensions_mut()
                        .insert(AuthenticatedUser { id: payload.sub });
                    return next.run(request).await;
                }
            }
        }
    }

    // Local fallback for single-station setups without the auth service.
    if let Ok(operator) = std::env::var("STATION_OPERATOR_ID") {
        if !operator.trim().is_empty() {
            request
                .extensions_mut()
                .insert(AuthenticatedUser { id: operator });
            return next.run(request).await;
        }
    }

    Redirect::to("/login").into_response()
}

/// Admin pages sit behind the normal auth layer plus a role check.
pub async fn require_admin(
    State(pool): State<SqlitePool>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>().cloned() else {
        return Redirect::to("/login").into_response();
    };

    match user_roles_repo::has_admin_role(&pool, &user.id).await {
        Ok(true) => next.run(request).await,
        Ok(false) => Redirect::to("/scanner?notice=admin_required").into_response(),
        Err(e) => {
            tracing::error!("Admin role lookup failed for {}: {}", user.id, e);
            Redirect::to("/scanner?notice=error").into_response()
        }
    }
}
