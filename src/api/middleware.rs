//! API middleware
//!
//! Contains:
//! - Shared application state
//! - The JSON error type returned by every handler
//! - The admin session gate

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::repositories::{SqlxDonationRepository, SqlxDonorRepository};
use crate::models::AdminSession;
use crate::services::{
    AuthService, AuthServiceError, DonationService, DonationServiceError, DonorService,
    DonorServiceError, MemorySessionStore, SessionStore,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub donor_service: Arc<DonorService>,
    pub donation_service: Arc<DonationService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Wire repositories and services over `pool` with the given session store
    pub fn new(pool: SqlitePool, admin: AdminConfig, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            donor_service: Arc::new(DonorService::new(SqlxDonorRepository::boxed(pool.clone()))),
            donation_service: Arc::new(DonationService::new(SqlxDonationRepository::boxed(pool))),
            auth_service: Arc::new(AuthService::new(admin, sessions)),
        }
    }

    /// Same as [`AppState::new`] with a fresh in-memory session store
    pub fn with_memory_sessions(pool: SqlitePool, admin: AdminConfig) -> Self {
        Self::new(pool, admin, MemorySessionStore::boxed())
    }
}

/// Error response for API errors: `{"error": "<message>"}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<DonorServiceError> for ApiError {
    fn from(e: DonorServiceError) -> Self {
        match e {
            DonorServiceError::ValidationError(msg) => Self::validation_error(msg),
            DonorServiceError::DuplicateStudentId(_) => {
                Self::validation_error("Student ID already registered")
            }
            DonorServiceError::NotFound => Self::not_found("Donor not found"),
            DonorServiceError::InternalError(e) => Self::internal_error(format!("{:#}", e)),
        }
    }
}

impl From<DonationServiceError> for ApiError {
    fn from(e: DonationServiceError) -> Self {
        match e {
            DonationServiceError::ValidationError(msg) => Self::validation_error(msg),
            DonationServiceError::DonorNotFound => Self::not_found("Donor not found"),
            DonationServiceError::InternalError(e) => Self::internal_error(format!("{:#}", e)),
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(e: AuthServiceError) -> Self {
        match e {
            AuthServiceError::ValidationError(msg) => Self::validation_error(msg),
            AuthServiceError::AuthenticationError | AuthServiceError::AuthorizationError => {
                Self::unauthorized(e.to_string())
            }
        }
    }
}

/// Extract the admin token from the `Authorization` header
///
/// The token is sent raw; a `Bearer ` prefix is tolerated.
pub fn extract_admin_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Admin session gate
///
/// Rejects with 401 unless the request carries an active session token; the
/// session is made available to handlers as an extension.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session: AdminSession = state
        .auth_service
        .require_session(extract_admin_token(request.headers()))
        .await?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
