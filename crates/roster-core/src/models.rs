//! Domain models for Roster.

pub mod project;
pub mod resource;
