//! Resource domain model.
//!
//! A resource is a person (or person-like record) that can be assigned to
//! any number of projects. The assignment is stored on both sides: the
//! resource keeps `projects`, each project keeps `members`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RosterError, RosterResult};
use crate::models::project::Project;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub identity_card: Option<String>,
    pub address: Option<String>,
    /// Arbitrary key-value metadata.
    pub metadata: serde_json::Value,
    /// Ids of the projects this resource was last assigned to.
    pub projects: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Replace the project id list with the resolved project documents.
    ///
    /// `projects` may be in any order and may be missing ids that no longer
    /// resolve; the result follows the order stored on the resource.
    pub fn with_projects(self, mut projects: Vec<Project>) -> ResourceDetail {
        let mut ordered = Vec::with_capacity(projects.len());
        for id in &self.projects {
            if let Some(pos) = projects.iter().position(|p| p.id == *id) {
                ordered.push(projects.swap_remove(pos));
            }
        }

        ResourceDetail {
            id: self.id,
            name: self.name,
            phone_number: self.phone_number,
            email: self.email,
            identity_card: self.identity_card,
            address: self.address,
            metadata: self.metadata,
            projects: ordered,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A resource with its project references resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetail {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub identity_card: Option<String>,
    pub address: Option<String>,
    pub metadata: serde_json::Value,
    pub projects: Vec<Project>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a resource.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub identity_card: Option<String>,
    pub address: Option<String>,
    pub metadata: Option<serde_json::Value>,
    /// Projects to join. `None` and an empty list both leave every
    /// project untouched.
    pub projects: Option<Vec<Uuid>>,
}

impl CreateResource {
    pub fn validate(&self) -> RosterResult<()> {
        validate_metadata(self.metadata.as_ref())
    }
}

/// Fields that can be updated on an existing resource.
///
/// For the text fields `None` means "leave unchanged", `Some(None)` (a JSON
/// `null`) clears the field and `Some(Some(v))` sets it. When `projects` is
/// `Some`, the list becomes the complete target membership, including
/// `Some(vec![])`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResource {
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub identity_card: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    pub metadata: Option<serde_json::Value>,
    pub projects: Option<Vec<Uuid>>,
}

impl UpdateResource {
    pub fn validate(&self) -> RosterResult<()> {
        validate_metadata(self.metadata.as_ref())
    }
}

/// A present key, `null` included, deserializes to `Some`. Absent keys fall
/// back to `None` through `#[serde(default)]`.
fn clearable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

fn validate_metadata(metadata: Option<&serde_json::Value>) -> RosterResult<()> {
    match metadata {
        None | Some(serde_json::Value::Object(_)) => Ok(()),
        Some(_) => Err(RosterError::validation("metadata must be a JSON object")),
    }
}
