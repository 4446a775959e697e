//! Admin API endpoints
//!
//! Session lifecycle:
//! - POST /api/admin/login
//! - POST /api/admin/logout
//! - GET  /api/admin/verify
//!
//! Session-gated:
//! - GET  /api/admin/donors - Donors with donation summaries
//! - POST /api/admin/donations - Record a donation
//! - GET  /api/admin/donations/{donor_id} - Donation history

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::common::{json_body, parse_id};
use crate::api::middleware::{self, extract_admin_token, ApiError, AppState};
use crate::models::{Donation, DonorSummary, RecordDonationInput};

/// Request body for admin login
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub authenticated: bool,
}

/// Build the admin router
pub fn router(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/donors", get(list_donors_with_summary))
        .route("/donations", post(record_donation))
        .route("/donations/{donor_id}", get(donation_history))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_admin,
        ));

    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify", get(verify))
        .merge(gated)
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let body = json_body(payload)?;
    let session = state
        .auth_service
        .login(body.username.as_deref(), body.password.as_deref())
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        token: session.token,
        message: "Login successful".to_string(),
    }))
}

/// POST /api/admin/logout
///
/// Always succeeds, whether or not the token was active.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<LogoutResponse> {
    state.auth_service.logout(extract_admin_token(&headers)).await;
    Json(LogoutResponse {
        success: true,
        message: "Logout successful".to_string(),
    })
}

/// GET /api/admin/verify
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let authenticated = state.auth_service.verify(extract_admin_token(&headers)).await;
    let status = if authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(VerifyResponse { authenticated }))
}

/// GET /api/admin/donors
pub async fn list_donors_with_summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<DonorSummary>>, ApiError> {
    Ok(Json(state.donor_service.list_with_summary().await?))
}

/// POST /api/admin/donations
pub async fn record_donation(
    State(state): State<AppState>,
    payload: Result<Json<RecordDonationInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = json_body(payload)?;
    let donation = state.donation_service.record(input).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

/// GET /api/admin/donations/{donor_id}
///
/// A non-numeric id matches no donor and yields an empty history.
pub async fn donation_history(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
) -> Result<Json<Vec<Donation>>, ApiError> {
    let donations = match parse_id(&donor_id) {
        Some(id) => state.donation_service.history(id).await?,
        None => Vec::new(),
    };
    Ok(Json(donations))
}
