//! `/resources` handlers.
//!
//! Each handler has one generic failure status: 400 for create and update,
//! 500 for get, search and delete. A missing resource is always 404.
//! Malformed ids and bodies count as that handler's generic failure.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use roster_core::error::{RosterError, RosterResult};
use roster_core::filter::{ResourceFilter, SearchParams};
use roster_core::models::resource::{CreateResource, Resource, ResourceDetail, UpdateResource};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

fn parse_id(raw: &str) -> RosterResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RosterError::InvalidId(raw.to_owned()))
}

/// Log `err` and pick the response for it.
fn reject(err: RosterError, id: &str, action: &str, fallback: ApiError) -> ApiError {
    let api = ApiError::classify(&err, fallback);
    if api == ApiError::NotFound {
        warn!(resource_id = %id, action, "Resource not found");
    } else {
        error!(resource_id = %id, action, error = %err, "Resource request failed");
    }
    api
}

/// `POST /resources`
pub async fn create_resource(
    State(state): State<AppState>,
    body: Result<Json<CreateResource>, JsonRejection>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    let Json(input) = body.map_err(|e| {
        error!(error = %e.body_text(), "Error creating resource");
        ApiError::BadRequest
    })?;

    match state.service.create(input).await {
        Ok(resource) => {
            info!(resource_id = %resource.id, "Resource created successfully");
            Ok((StatusCode::CREATED, Json(resource)))
        }
        Err(e) => {
            error!(error = %e, "Error creating resource");
            Err(ApiError::BadRequest)
        }
    }
}

/// `GET /resources/{id}` with projects populated.
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResourceDetail>, ApiError> {
    let result = match parse_id(&id) {
        Ok(uuid) => state.service.get(uuid).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(resource) => {
            info!(resource_id = %id, "Fetched resource by id");
            Ok(Json(resource))
        }
        Err(e) => Err(reject(e, &id, "get", ApiError::Internal)),
    }
}

/// `GET /resources?search=term`
pub async fn search_resources(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let Query(params) = params.map_err(|e| {
        error!(error = %e.body_text(), "Error searching resources");
        ApiError::Internal
    })?;

    match state.service.search(ResourceFilter::from(params)).await {
        Ok(resources) => {
            info!(count = resources.len(), "Searched resources");
            Ok(Json(resources))
        }
        Err(e) => {
            error!(error = %e, "Error searching resources");
            Err(ApiError::Internal)
        }
    }
}

/// `PUT`/`PATCH /resources/{id}`
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateResource>, JsonRejection>,
) -> Result<Json<Resource>, ApiError> {
    let Json(input) = body.map_err(|e| {
        error!(resource_id = %id, error = %e.body_text(), "Error updating resource");
        ApiError::BadRequest
    })?;

    let result = match parse_id(&id) {
        Ok(uuid) => state.service.update(uuid, input).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(resource) => {
            info!(resource_id = %id, "Resource updated successfully");
            Ok(Json(resource))
        }
        Err(e) => Err(reject(e, &id, "update", ApiError::BadRequest)),
    }
}

/// `DELETE /resources/{id}`. Project membership is left as is.
pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let result = match parse_id(&id) {
        Ok(uuid) => state.service.delete(uuid).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => {
            info!(resource_id = %id, "Resource deleted successfully");
            Ok((StatusCode::OK, "Resource deleted successfully"))
        }
        Err(e) => Err(reject(e, &id, "delete", ApiError::Internal)),
    }
}
