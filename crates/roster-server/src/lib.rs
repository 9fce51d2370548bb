//! Roster Server — HTTP API for resources and their project membership.
//!
//! The database connection is opened once at startup and reaches the
//! handlers through [`AppState`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
