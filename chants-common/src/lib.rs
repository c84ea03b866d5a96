//! # Chants Common Library
//!
//! Shared code for the chant suggestion service:
//! - Song record model and liturgical roles
//! - Database initialization and random selection queries
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use db::models::{Chant, ChantType, Propositions, DEFAULT_TEMPS};
pub use error::{Error, Result};
