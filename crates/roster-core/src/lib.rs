//! Roster Core — domain models, error taxonomy, search filters and the
//! repository traits shared by the database and HTTP crates.
//!
//! The [`service::ResourceService`] is where resource writes meet the
//! project membership synchronizer.

pub mod error;
pub mod filter;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{RosterError, RosterResult};
