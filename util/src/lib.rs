pub mod config;
pub mod event_date;
pub mod mailer;
pub mod paths;
pub mod state;
pub mod test_helpers;
