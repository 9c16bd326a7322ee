//! Row models and DTOs, one module per table.

pub mod application;
pub mod department;
pub mod log;
pub mod offer;
pub mod project;
pub mod user;
