//! Admin authentication service
//!
//! Implements the admin session lifecycle:
//! - login against the configured credential pair
//! - logout (idempotent)
//! - token verification and the session gate used by admin routes
//!
//! Tokens are random UUIDv4 values in simple (hex) form. A freshly generated
//! token is re-rolled if it is already active, so tokens are unique among the
//! live sessions.

use crate::config::AdminConfig;
use crate::models::AdminSession;
use crate::services::session_store::SessionStore;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Username or password missing from the request
    #[error("{0}")]
    ValidationError(String),

    /// Credentials did not match
    #[error("Invalid credentials")]
    AuthenticationError,

    /// Missing or unknown session token
    #[error("Unauthorized: Admin login required")]
    AuthorizationError,
}

pub struct AuthService {
    credentials: AdminConfig,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(credentials: AdminConfig, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    /// Log in and open a new session
    ///
    /// Failed attempts leave no trace in the session store.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<AdminSession, AuthServiceError> {
        let (Some(username), Some(password)) = (
            username.filter(|u| !u.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthServiceError::ValidationError(
                "Username and password required".to_string(),
            ));
        };

        if !self.credentials_match(username, password) {
            tracing::warn!(username, "Admin login failed");
            return Err(AuthServiceError::AuthenticationError);
        }

        loop {
            let session = AdminSession::new(generate_token(), username.to_string());
            if self.sessions.put(session.clone()).await {
                tracing::info!(username, "Admin logged in");
                return Ok(session);
            }
        }
    }

    /// Drop the session for `token` if there is one
    pub async fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            if let Some(session) = self.sessions.delete(token).await {
                tracing::info!(username = %session.username, "Admin logged out");
            }
        }
    }

    /// Whether `token` belongs to an active session
    pub async fn verify(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) if !token.is_empty() => self.sessions.contains(token).await,
            _ => false,
        }
    }

    /// Gate for admin operations
    pub async fn require_session(&self, token: Option<&str>) -> Result<AdminSession, AuthServiceError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthServiceError::AuthorizationError)?;
        self.sessions
            .get(token)
            .await
            .ok_or(AuthServiceError::AuthorizationError)
    }

    fn credentials_match(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.credentials.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.credentials.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}
