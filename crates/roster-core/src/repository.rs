//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in
//! `roster-db`; the service layer only depends on these traits.

use uuid::Uuid;

use crate::error::RosterResult;
use crate::filter::ResourceFilter;
use crate::models::{
    project::{CreateProject, Project},
    resource::{CreateResource, Resource, UpdateResource},
};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

pub trait ResourceRepository: Send + Sync {
    /// Persist a new resource. `input.projects` is stored as given; the
    /// caller is responsible for deduplicating it.
    fn create(&self, input: CreateResource) -> impl Future<Output = RosterResult<Resource>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RosterResult<Resource>> + Send;
    /// Partial update. Fails with `NotFound` when no resource has `id`.
    fn update(
        &self,
        id: Uuid,
        input: UpdateResource,
    ) -> impl Future<Output = RosterResult<Resource>> + Send;
    /// Delete and return the removed resource. Project membership is left
    /// untouched.
    fn delete(&self, id: Uuid) -> impl Future<Output = RosterResult<Resource>> + Send;
    /// All resources matching `filter`, oldest first.
    fn search(
        &self,
        filter: ResourceFilter,
    ) -> impl Future<Output = RosterResult<Vec<Resource>>> + Send;
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub trait ProjectRepository: Send + Sync {
    fn create(&self, input: CreateProject) -> impl Future<Output = RosterResult<Project>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RosterResult<Project>> + Send;
    /// Fetch the projects whose ids are in `ids`. Unknown ids are skipped.
    fn get_many(&self, ids: Vec<Uuid>) -> impl Future<Output = RosterResult<Vec<Project>>> + Send;
}

// ---------------------------------------------------------------------------
// Membership synchronization
// ---------------------------------------------------------------------------

/// Which write path triggered a synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// A brand-new resource: only add, there is nothing to remove from.
    Create,
    /// An existing resource: add to targets and remove from every other project.
    Update,
}

/// Number of project documents whose `members` actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub added: u64,
    pub removed: u64,
}

/// Reconciles a resource's presence across the `members` sets of all projects.
pub trait MembershipSync: Send + Sync {
    /// Add `resource_id` to every project in `targets`; with
    /// [`SyncMode::Update`] also remove it from every project not in
    /// `targets`. Unknown project ids match nothing and are not an error.
    fn sync(
        &self,
        resource_id: Uuid,
        targets: Vec<Uuid>,
        mode: SyncMode,
    ) -> impl Future<Output = RosterResult<SyncOutcome>> + Send;
}
