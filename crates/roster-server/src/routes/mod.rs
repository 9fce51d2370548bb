//! HTTP routes.

mod health;
mod resources;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use health::health_handler;
pub use resources::{
    create_resource, delete_resource, get_resource, search_resources, update_resource,
};

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/resources", get(search_resources).post(create_resource))
        .route(
            "/resources/{id}",
            get(get_resource)
                .put(update_resource)
                .patch(update_resource)
                .delete(delete_resource),
        )
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
