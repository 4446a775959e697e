//! Services layer - Business logic
//!
//! Services are responsible for:
//! - Validating required fields before any store call
//! - Translating store outcomes into typed error kinds
//! - Managing admin sessions

pub mod auth;
pub mod donation;
pub mod donor;
pub mod session_store;
pub mod validation;

pub use auth::{AuthService, AuthServiceError};
pub use donation::{DonationService, DonationServiceError};
pub use donor::{DonorService, DonorServiceError};
pub use session_store::{MemorySessionStore, SessionStore};
