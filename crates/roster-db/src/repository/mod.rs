//! SurrealDB repository implementations.

mod project;
mod resource;

pub use project::SurrealProjectRepository;
pub use resource::{SurrealResourceRepository, search_clause};

use uuid::Uuid;

use crate::error::DbError;

/// Parse a UUID read back from the store.
fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
}

/// Parse a stored id list, e.g. `resource.projects` or `project.members`.
fn parse_uuids(values: &[String], what: &str) -> Result<Vec<Uuid>, DbError> {
    values.iter().map(|v| parse_uuid(v, what)).collect()
}

fn uuid_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}
