pub mod middleware;
pub mod routes;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::services::recent_actions::RecentActions;

/// Shared handler state: the database pool plus the process-local duplicate
/// suppression window.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub recent_actions: RecentActions,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.pool.clone()
    }
}

impl FromRef<AppState> for RecentActions {
    fn from_ref(state: &AppState) -> RecentActions {
        state.recent_actions.clone()
    }
}
