//! External service integrations.
//!
//! Provides the SMTP mailer and the composition of report emails.

pub mod email;
