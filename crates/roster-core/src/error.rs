//! Error types for Roster.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RosterError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
