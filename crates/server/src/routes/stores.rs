use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use models::store::{NewStore, OwnerId, Store, StoreFilter, StoreId, StorePatch};
use service::errors::ServiceError;
use service::store::StoreRepository;

use crate::errors::JsonApiError;

/// Shared handler state: the store collection behind its repository trait.
#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<dyn StoreRepository>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Case-insensitive substring match on the store name.
    pub name: Option<String>,
    /// Owner identifier; must be well-formed or the request fails with 400.
    pub owner: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: StoreId,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub message: String,
    pub store: Store,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

/// Path ids arrive as text. A blank id is a caller error; an id that does
/// not parse cannot match any stored document, so it collapses to 404.
fn parse_id(raw: &str) -> Result<StoreId, JsonApiError> {
    if raw.trim().is_empty() {
        return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "ID parameter is required", None));
    }
    raw.parse::<StoreId>()
        .map_err(|_| JsonApiError::new(StatusCode::NOT_FOUND, "Store not found", None))
}

#[utoipa::path(
    get, path = "/stores", tag = "stores",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching stores"),
        (status = 400, description = "Invalid owner_id format"),
        (status = 404, description = "No matching stores found"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Store>>, JsonApiError> {
    let mut filter = StoreFilter { name: q.name, ..StoreFilter::default() };
    if let Some(owner) = q.owner.as_deref() {
        match owner.parse::<OwnerId>() {
            Ok(id) => filter.owner = Some(id),
            Err(_) => {
                return Err(JsonApiError::new(
                    StatusCode::BAD_REQUEST,
                    "Invalid owner_id format",
                    None,
                ))
            }
        }
    }

    match state.stores.find(&filter).await {
        Ok(list) if list.is_empty() => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, "No matching stores found", None))
        }
        Ok(list) => {
            info!(count = list.len(), "list stores");
            Ok(Json(list))
        }
        Err(e) => {
            error!(err = %e, "list stores failed");
            Err(JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve stores",
                Some(e.to_string()),
            ))
        }
    }
}

#[utoipa::path(
    get, path = "/stores/{id}", tag = "stores",
    params(("id" = String, Path, description = "Store ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 400, description = "Missing ID"),
        (status = 404, description = "Store not found"),
        (status = 500, description = "Lookup Failed")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Store>, JsonApiError> {
    let id = parse_id(&id)?;
    match state.stores.find_by_id(id).await {
        Ok(Some(store)) => Ok(Json(store)),
        Ok(None) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Store not found", None)),
        Err(e) => {
            error!(err = %e, "get store failed");
            Err(JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve store",
                Some(e.to_string()),
            ))
        }
    }
}

#[utoipa::path(
    post, path = "/stores", tag = "stores",
    request_body = crate::openapi::NewStoreDoc,
    responses(
        (status = 201, description = "New store added"),
        (status = 422, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewStore>,
) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    match state.stores.insert(input).await {
        Ok(store) => {
            info!(id = %store.id, "created store");
            Ok((
                StatusCode::CREATED,
                Json(CreatedResponse { message: "New store added".into(), id: store.id }),
            ))
        }
        Err(e) => match e {
            ServiceError::Validation(_) | ServiceError::Model(_) => Err(JsonApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Failed to create store",
                Some(e.to_string()),
            )),
            _ => {
                error!(err = %e, "create store failed");
                Err(JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create store",
                    Some(e.to_string()),
                ))
            }
        },
    }
}

#[utoipa::path(
    put, path = "/stores/{id}", tag = "stores",
    params(("id" = String, Path, description = "Store ID")),
    request_body = crate::openapi::StorePatchDoc,
    responses(
        (status = 200, description = "Store updated successfully"),
        (status = 400, description = "Missing ID"),
        (status = 404, description = "Store not found"),
        (status = 422, description = "Validation Error"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<StorePatch>,
) -> Result<Json<UpdatedResponse>, JsonApiError> {
    let id = parse_id(&id)?;
    match state.stores.update(id, patch).await {
        Ok(store) => {
            info!(id = %store.id, "updated store");
            Ok(Json(UpdatedResponse { message: "Store updated successfully".into(), store }))
        }
        Err(e) => match e {
            ServiceError::NotFound(_) => {
                Err(JsonApiError::new(StatusCode::NOT_FOUND, "Store not found", None))
            }
            ServiceError::Validation(_) | ServiceError::Model(_) => Err(JsonApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Failed to update store",
                Some(e.to_string()),
            )),
            _ => {
                error!(err = %e, "update store failed");
                Err(JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to update store",
                    Some(e.to_string()),
                ))
            }
        },
    }
}

#[utoipa::path(
    delete, path = "/stores/{id}", tag = "stores",
    params(("id" = String, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store deleted successfully"),
        (status = 400, description = "Missing ID"),
        (status = 404, description = "Store not found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    let id = parse_id(&id)?;
    match state.stores.delete(id).await {
        Ok(true) => {
            info!(%id, "deleted store");
            Ok(Json(DeletedResponse { message: "Store deleted successfully".into() }))
        }
        Ok(false) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Store not found", None)),
        Err(e) => {
            error!(err = %e, "delete store failed");
            Err(JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete store",
                Some(e.to_string()),
            ))
        }
    }
}
