//! Offer lifecycle and archival engines.
//!
//! - [`lifecycle`] runs the daily expiration sweep: one-shot 2-day, 1-day
//!   and expired notices per offer.
//! - [`archive`] bundles an expired offer's applications into a zip while
//!   the archive window is open.

pub mod archive;
pub mod lifecycle;
