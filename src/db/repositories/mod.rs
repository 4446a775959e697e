//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the statements for a single table.

pub mod donation;
pub mod donor;

pub use donation::{DonationRepository, SqlxDonationRepository};
pub use donor::{DonorRepository, SqlxDonorRepository};
