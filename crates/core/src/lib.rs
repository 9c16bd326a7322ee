pub mod clock;
pub mod documents;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod offers;
pub mod ownership;
pub mod roles;
pub mod types;
