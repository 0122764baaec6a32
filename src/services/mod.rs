pub mod category_rules;
pub mod checkin_service;
pub mod dashboard_service;
pub mod recent_actions;
pub mod registration_service;
