//! Shared application state.

use roster_core::service::ResourceService;
use roster_db::DbManager;
use roster_db::repository::{SurrealProjectRepository, SurrealResourceRepository};
use surrealdb::engine::any::Any;

pub type Service = ResourceService<SurrealResourceRepository<Any>, SurrealProjectRepository<Any>>;

/// State handed to every handler. Cloning is cheap: the SurrealDB client is
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    pub service: Service,
    pub db: DbManager,
}

impl AppState {
    pub fn new(db: DbManager) -> Self {
        let client = db.client().clone();
        let service = ResourceService::new(
            SurrealResourceRepository::new(client.clone()),
            SurrealProjectRepository::new(client),
        );
        Self { service, db }
    }
}
