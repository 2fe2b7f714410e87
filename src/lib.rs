//! Animal Vision & Encyclopedia web application.
//!
//! Serves a curated, localized animal encyclopedia and an upload endpoint
//! that forwards images to a hosted vision-language model for identification.

/// Environment-sourced configuration.
pub mod config;
/// Static encyclopedia data and lookups.
pub mod encyclopedia;
/// Application error taxonomy and JSON boundary mapping.
pub mod error;
/// Languages, UI translations, and localized data fields.
pub mod i18n;
/// Router construction, page handlers, and the upload endpoint.
pub mod routes;
/// Upload validation, mime table, data-URI encoding, temp staging.
pub mod upload;
/// Vision-language model client.
pub mod vision;

pub use config::Config;
pub use error::AppError;
pub use routes::{router, AppState};
