use axum::{
    middleware,
    response::Redirect,
    routing::{get, get_service, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use scanstation::database::schema;
use scanstation::services::recent_actions::RecentActions;
use scanstation::web::middleware::auth as auth_middleware;
use scanstation::web::routes::{admin, attendee, auth, register, scanner};
use scanstation::web::AppState;

#[tokio::main]
async fn main() {
    // Laad .env bestand
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();
    println!("scanstation build {}", env!("SCANSTATION_BUILD_ID"));

    // 2. Verbind met de database. WAL + busy timeout: meerdere stations
    // schrijven tegelijk naar hetzelfde bestand.
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://scanstation.db".to_string());
    println!("Verbinden met database: {}", db_url);

    let connect_options = SqliteConnectOptions::from_str(&db_url)
        .expect("DATABASE_URL is geen geldige sqlite URL")
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options)
        .await
        .expect("Kan niet verbinden met DB");

    schema::ensure_schema(&pool)
        .await
        .expect("Kan schema niet toepassen");

    let state = AppState {
        pool,
        recent_actions: RecentActions::new(),
    };

    // 3. Admin routes achter een extra rollen-check
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_dashboard_handler))
        .route("/admin/settings", post(admin::admin_settings_handler))
        .route("/admin/export.csv", get(admin::admin_export_csv_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_admin,
        ));

    // 4. Alle stations-routes onder één auth layer
    let protected_routes = Router::new()
        .route("/scanner", get(scanner::scanner_page))
        .route("/scan", post(scanner::scan_handler))
        .route(
            "/register",
            get(register::register_page).post(register::register_handler),
        )
        .route(
            "/attendees/:attendee_id",
            get(attendee::attendee_profile_handler),
        )
        .route(
            "/attendees/:attendee_id/actions",
            post(attendee::attendee_action_handler),
        )
        .route("/logout", post(auth::logout_handler))
        .merge(admin_routes)
        .layer(middleware::from_fn(auth_middleware::require_auth));

    // 5. Bouw de hele applicatie
    let app = Router::new()
        // Public routes
        .route("/", get(|| async { Redirect::to("/scanner") }))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        // Protected routes
        .merge(protected_routes)
        // Static files
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(state);

    // 6. Start de server (met fallback poort)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Kan host/port niet parsen");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Kon niet binden op {}: {}. Probeer fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Kan fallback niet parsen");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Kan niet binden op fallback poort")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("🚀 Scan station draait op http://{}", bound_addr);
    println!("📍 Ga naar http://{}/login om te beginnen", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
