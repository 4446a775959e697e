//! Data models
//!
//! Data structures used throughout the donor registry:
//! - Database entities (Donor, Donation)
//! - Session registry records (AdminSession)
//! - Raw request inputs, validated by the service layer

mod donation;
mod donor;
mod session;

pub use donation::{Donation, RecordDonationInput};
pub use donor::{BloodGroup, CreateDonorInput, Donor, DonorChanges, DonorSummary, NewDonor, UpdateDonorInput};
pub use session::AdminSession;
