//! Outbound notifications for the offer portal.
//!
//! - [`Mailer`] is the single send primitive used by application
//!   submission and the expiration sweep.
//! - [`delivery::email`] implements it over SMTP.
//! - [`templates`] renders the HTML bodies.

pub mod delivery;
pub mod mailer;
pub mod templates;

pub use delivery::email::{EmailConfig, SmtpMailer};
pub use mailer::{DisabledMailer, EmailError, Mailer};
