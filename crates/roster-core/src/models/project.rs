//! Project domain model.
//!
//! Projects are owned outside this service. Roster only ever touches
//! their `members` set, which mirrors the `projects` list stored on each
//! [`Resource`](super::resource::Resource).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A container entity whose membership is a set of resource ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Resource ids; unique, order irrelevant.
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn has_member(&self, resource_id: Uuid) -> bool {
        self.members.contains(&resource_id)
    }
}

/// Fields required to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<Uuid>,
}
