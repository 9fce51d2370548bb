//! Resource service: resource writes plus project membership sync.

use tracing::debug;
use uuid::Uuid;

use crate::error::RosterResult;
use crate::filter::ResourceFilter;
use crate::models::resource::{
    CreateResource, Resource, ResourceDetail, UpdateResource, dedup_ids,
};
use crate::repository::{MembershipSync, ProjectRepository, ResourceRepository, SyncMode};

/// Orchestrates resource CRUD and keeps project `members` in step.
///
/// Generic over repository implementations so that this crate has no
/// dependency on the database crate.
#[derive(Clone)]
pub struct ResourceService<R, P> {
    resources: R,
    projects: P,
}

impl<R, P> ResourceService<R, P>
where
    R: ResourceRepository,
    P: ProjectRepository + MembershipSync,
{
    pub fn new(resources: R, projects: P) -> Self {
        Self {
            resources,
            projects,
        }
    }

    /// Create a resource and add it to the requested projects.
    pub async fn create(&self, mut input: CreateResource) -> RosterResult<Resource> {
        input.validate()?;
        input.projects = input.projects.as_deref().map(dedup_ids);
        let targets = input.projects.clone().unwrap_or_default();

        let resource = self.resources.create(input).await?;

        if !targets.is_empty() {
            let outcome = self
                .projects
                .sync(resource.id, targets, SyncMode::Create)
                .await?;
            debug!(
                resource_id = %resource.id,
                added = outcome.added,
                "Synchronized project membership"
            );
        }

        Ok(resource)
    }

    /// Fetch a resource with its projects resolved.
    pub async fn get(&self, id: Uuid) -> RosterResult<ResourceDetail> {
        let resource = self.resources.get_by_id(id).await?;
        let projects = if resource.projects.is_empty() {
            Vec::new()
        } else {
            self.projects.get_many(resource.projects.clone()).await?
        };
        Ok(resource.with_projects(projects))
    }

    pub async fn search(&self, filter: ResourceFilter) -> RosterResult<Vec<Resource>> {
        self.resources.search(filter).await
    }

    /// Apply a partial update. When `projects` is present it becomes the
    /// complete membership: the resource joins every listed project and
    /// leaves every other one.
    pub async fn update(&self, id: Uuid, mut input: UpdateResource) -> RosterResult<Resource> {
        input.validate()?;
        input.projects = input.projects.as_deref().map(dedup_ids);
        let targets = input.projects.clone();

        let resource = self.resources.update(id, input).await?;

        if let Some(targets) = targets {
            let outcome = self
                .projects
                .sync(resource.id, targets, SyncMode::Update)
                .await?;
            debug!(
                resource_id = %resource.id,
                added = outcome.added,
                removed = outcome.removed,
                "Synchronized project membership"
            );
        }

        Ok(resource)
    }

    /// Delete a resource. Projects keep the id in `members`.
    pub async fn delete(&self, id: Uuid) -> RosterResult<Resource> {
        self.resources.delete(id).await
    }
}
