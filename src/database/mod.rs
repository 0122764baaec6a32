pub mod activity_log_repo;
pub mod attendee_repo;
pub mod counter_repo;
pub mod event_settings_repo;
pub mod schema;
pub mod user_roles_repo;
