//! Public donor API endpoints
//!
//! - POST   /api/donors - Register a donor
//! - GET    /api/donors - List donors
//! - GET    /api/donors/search/{blood_group} - Search by blood group
//! - GET    /api/donors/{id} - Get a donor
//! - PUT    /api/donors/{id} - Update a donor
//! - DELETE /api/donors/{id} - Delete a donor (admin session required)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use crate::api::common::{json_body, parse_id, MessageResponse};
use crate::api::middleware::{self, ApiError, AppState};
use crate::models::{CreateDonorInput, Donor, UpdateDonorInput};

/// Build the donors router
pub fn router(state: AppState) -> Router<AppState> {
    let delete_route = delete(delete_donor).route_layer(axum_middleware::from_fn_with_state(
        state,
        middleware::require_admin,
    ));

    Router::new()
        .route("/", get(list_donors).post(create_donor))
        .route("/search/{blood_group}", get(search_donors))
        .route("/{id}", get(get_donor).put(update_donor).merge(delete_route))
}

/// POST /api/donors
pub async fn create_donor(
    State(state): State<AppState>,
    payload: Result<Json<CreateDonorInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;
    let donor = state.donor_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(donor)))
}

/// GET /api/donors
pub async fn list_donors(State(state): State<AppState>) -> Result<Json<Vec<Donor>>, ApiError> {
    Ok(Json(state.donor_service.list().await?))
}

/// GET /api/donors/search/{blood_group}
pub async fn search_donors(
    State(state): State<AppState>,
    Path(blood_group): Path<String>,
) -> Result<Json<Vec<Donor>>, ApiError> {
    Ok(Json(state.donor_service.search_by_blood_group(&blood_group).await?))
}

/// GET /api/donors/{id}
pub async fn get_donor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Donor>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Donor not found"))?;
    Ok(Json(state.donor_service.get(id).await?))
}

/// PUT /api/donors/{id}
///
/// A missing field answers 400 even when the id is unknown.
pub async fn update_donor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDonorInput>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let input = json_body(payload)?;
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Donor not found"))?;
    state.donor_service.update(id, input).await?;
    Ok(MessageResponse::new("Donor updated successfully"))
}

/// DELETE /api/donors/{id}
pub async fn delete_donor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Donor not found"))?;
    state.donor_service.delete(id).await?;
    Ok(MessageResponse::new("Donor deleted successfully"))
}
