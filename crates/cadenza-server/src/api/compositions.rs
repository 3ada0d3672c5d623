use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use cadenza_core::model::{CompositionFilter, CompositionId, CompositionRequest};
use cadenza_core::Error as CatalogError;

use super::types::CompositionResponse;
use crate::{ApiError, AppState};

/// GET /api/composition
pub async fn list_compositions(
    State(state): State<AppState>,
    query: Result<Query<CompositionFilter>, QueryRejection>,
) -> Result<Json<Vec<CompositionResponse>>, ApiError> {
    let Query(filter) = query?;
    let compositions = state.with_catalog(|catalog| catalog.list_compositions(&filter))?;
    Ok(Json(
        compositions.iter().map(CompositionResponse::from).collect(),
    ))
}

/// GET /api/composition/{id}
pub async fn get_composition(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CompositionResponse>, ApiError> {
    let Path(id) = path?;
    let id = CompositionId::from_uuid(id);
    let composition = state
        .with_catalog(|catalog| catalog.get_composition(id))?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(CompositionResponse::from(&composition)))
}

/// POST /api/composition
pub async fn create_composition(
    State(state): State<AppState>,
    body: Result<Json<CompositionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompositionResponse>), ApiError> {
    let Json(request) = body?;
    let composition = state.with_catalog(|catalog| catalog.create_composition(&request))?;
    tracing::info!("POST /api/composition -> {}", composition.id);
    Ok((
        StatusCode::CREATED,
        Json(CompositionResponse::from(&composition)),
    ))
}

/// PATCH /api/composition/{id}
pub async fn update_composition(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CompositionRequest>, JsonRejection>,
) -> Result<Json<CompositionResponse>, ApiError> {
    let Path(id) = path?;
    let Json(request) = body?;
    let id = CompositionId::from_uuid(id);
    let composition = state.with_catalog(|catalog| catalog.update_composition(id, &request))?;
    Ok(Json(CompositionResponse::from(&composition)))
}

/// DELETE /api/composition/{id}
pub async fn delete_composition(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let id = CompositionId::from_uuid(id);
    if state.with_catalog(|catalog| catalog.delete_composition(id))? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: CompositionId) -> ApiError {
    ApiError::Catalog(CatalogError::ReferenceNotFound {
        entity: "composition",
        id: id.to_string(),
    })
}
