pub mod activity_log;
pub mod attendees;
pub mod event_settings;

pub use activity_log::ActivityLogRow;
pub use attendees::AttendeeRow;
pub use event_settings::EventSettingsRow;
