//! HTTP API handlers for chants-api

pub mod buildinfo;
pub mod chants;
pub mod health;
pub mod ui;

pub use buildinfo::get_build_info;
pub use chants::get_chants;
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index};
