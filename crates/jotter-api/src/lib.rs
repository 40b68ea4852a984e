//! jotter-api - note storage service for Jotter
//!
//! Serves the `/api/notes` routes the editor dialog talks to, backed by an
//! in-memory store with an optional JSON snapshot.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use error::AppError;
pub use routes::{app_router, AppState};
