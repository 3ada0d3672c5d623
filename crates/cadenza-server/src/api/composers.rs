use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use cadenza_core::model::ComposerId;
use cadenza_core::Error as CatalogError;

use super::types::ComposerResponse;
use crate::{ApiError, AppState};

/// GET /api/composer
pub async fn list_composers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ComposerResponse>>, ApiError> {
    let composers = state.with_catalog(|catalog| catalog.list_composers())?;
    Ok(Json(composers.iter().map(ComposerResponse::from).collect()))
}

/// GET /api/composer/{id}
pub async fn get_composer(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ComposerResponse>, ApiError> {
    let Path(id) = path?;
    let id = ComposerId::from_uuid(id);
    let composer = state
        .with_catalog(|catalog| catalog.get_composer(id))?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ComposerResponse::from(&composer)))
}

/// DELETE /api/composer/{id}
///
/// Deletes every composition the composer owns as well.
pub async fn delete_composer(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let id = ComposerId::from_uuid(id);
    if state.with_catalog(|catalog| catalog.delete_composer(id))? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: ComposerId) -> ApiError {
    ApiError::Catalog(CatalogError::ReferenceNotFound {
        entity: "composer",
        id: id.to_string(),
    })
}
