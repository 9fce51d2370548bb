//! SurrealDB implementation of [`ProjectRepository`] and the project
//! membership synchronizer.

use chrono::{DateTime, Utc};
use roster_core::error::RosterResult;
use roster_core::models::project::{CreateProject, Project};
use roster_core::models::resource::dedup_ids;
use roster_core::repository::{MembershipSync, ProjectRepository, SyncMode, SyncOutcome};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_uuid, parse_uuids, uuid_strings};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProjectRow {
    name: String,
    description: String,
    members: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self, id: Uuid) -> Result<Project, DbError> {
        Ok(Project {
            id,
            name: self.name,
            description: self.description,
            members: parse_uuids(&self.members, "member")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct ProjectRowWithId {
    record_id: String,
    name: String,
    description: String,
    members: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRowWithId {
    fn try_into_project(self) -> Result<Project, DbError> {
        let id = parse_uuid(&self.record_id, "project")?;
        ProjectRow {
            name: self.name,
            description: self.description,
            members: self.members,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_project(id)
    }
}

/// Post-update `members` of a project touched by a sync.
#[derive(Debug, SurrealValue)]
struct MembersRow {
    members: Vec<String>,
}

// Only rows whose membership actually changes are matched; the returned
// rows are the modified count. Nothing but `members` is written on a project.
const ADD_MEMBER: &str = "\
UPDATE project SET members = array::add(members, $resource_id) \
WHERE meta::id(id) INSIDE $targets AND members CONTAINSNOT $resource_id \
RETURN members";

// Add and remove are one statement and therefore one transaction.
const RECONCILE_MEMBER: &str = "\
UPDATE project SET members = IF meta::id(id) INSIDE $targets { \
    array::add(members, $resource_id) \
} ELSE { \
    array::complement(members, [$resource_id]) \
} \
WHERE (meta::id(id) INSIDE $targets AND members CONTAINSNOT $resource_id) \
   OR (meta::id(id) NOTINSIDE $targets AND members CONTAINS $resource_id) \
RETURN members";

/// SurrealDB implementation of the Project repository.
#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, input: CreateProject) -> RosterResult<Project> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('project', $id) SET \
                 name = $name, description = $description, \
                 members = $members",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("members", uuid_strings(&dedup_ids(&input.members))))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("project", id_str))?;

        row.into_project(id).map_err(Into::into)
    }

    async fn get_by_id(&self, id: Uuid) -> RosterResult<Project> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('project', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("project", id_str))?;

        row.into_project(id).map_err(Into::into)
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> RosterResult<Vec<Project>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM project \
                 WHERE meta::id(id) INSIDE $ids",
            )
            .bind(("ids", uuid_strings(&ids)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_project())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}

impl<C: Connection> MembershipSync for SurrealProjectRepository<C> {
    async fn sync(
        &self,
        resource_id: Uuid,
        targets: Vec<Uuid>,
        mode: SyncMode,
    ) -> RosterResult<SyncOutcome> {
        if mode == SyncMode::Create && targets.is_empty() {
            return Ok(SyncOutcome::default());
        }

        let resource_id_str = resource_id.to_string();
        let statement = match mode {
            SyncMode::Create => ADD_MEMBER,
            SyncMode::Update => RECONCILE_MEMBER,
        };

        let result = self
            .db
            .query(statement)
            .bind(("resource_id", resource_id_str.clone()))
            .bind(("targets", uuid_strings(&targets)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<MembersRow> = result.take(0).map_err(DbError::from)?;
        let added = rows
            .iter()
            .filter(|row| row.members.contains(&resource_id_str))
            .count() as u64;

        Ok(SyncOutcome {
            added,
            removed: rows.len() as u64 - added,
        })
    }
}
