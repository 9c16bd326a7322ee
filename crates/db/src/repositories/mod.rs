//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod application_repo;
pub mod department_repo;
pub mod log_repo;
pub mod offer_repo;
pub mod project_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use department_repo::DepartmentRepo;
pub use log_repo::LogRepo;
pub use offer_repo::OfferRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
