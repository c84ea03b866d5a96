//! Database models and queries

pub mod chants;
pub mod init;
pub mod models;

pub use chants::*;
pub use init::*;
pub use models::*;
