//! Donation service
//!
//! Records donations against existing donors and reads a donor's history.

use crate::db::is_foreign_key_violation;
use crate::db::repositories::DonationRepository;
use crate::models::{Donation, RecordDonationInput};
use chrono::NaiveDate;
use std::sync::Arc;

/// Error types for donation service operations
#[derive(Debug, thiserror::Error)]
pub enum DonationServiceError {
    #[error("{0}")]
    ValidationError(String),

    /// The referenced donor does not exist
    #[error("Donor not found")]
    DonorNotFound,

    #[error("{0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct DonationService {
    repo: Arc<dyn DonationRepository>,
}

impl DonationService {
    pub fn new(repo: Arc<dyn DonationRepository>) -> Self {
        Self { repo }
    }

    /// Record a donation
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `donor_id` or `donation_date` is missing or malformed
    /// - `DonorNotFound` if no donor has that id
    /// - `InternalError` for database errors
    pub async fn record(&self, input: RecordDonationInput) -> Result<Donation, DonationServiceError> {
        let (donor_id, donation_date) = validate_donation(input)?;

        match self.repo.create(donor_id, donation_date).await {
            Ok(donation) => {
                tracing::info!(
                    donor_id,
                    donation_id = donation.id,
                    %donation_date,
                    "Donation recorded"
                );
                Ok(donation)
            }
            Err(e) if is_foreign_key_violation(&e) => Err(DonationServiceError::DonorNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Donation history of a donor, newest first; empty for unknown donors
    pub async fn history(&self, donor_id: i64) -> Result<Vec<Donation>, DonationServiceError> {
        Ok(self.repo.list_by_donor(donor_id).await?)
    }
}

const REQUIRED_MESSAGE: &str = "Donor ID and donation date are required";

fn validate_donation(input: RecordDonationInput) -> Result<(i64, NaiveDate), DonationServiceError> {
    let donor_id = input.donor_id.as_ref().and_then(parse_donor_id);
    let date = input
        .donation_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let (Some(donor_id), Some(date)) = (donor_id, date) else {
        return Err(DonationServiceError::ValidationError(REQUIRED_MESSAGE.to_string()));
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        DonationServiceError::ValidationError(format!(
            "Invalid donation date '{}', expected YYYY-MM-DD",
            date
        ))
    })?;

    Ok((donor_id, date))
}

/// Accept a positive integer given as a JSON number or numeric string
fn parse_donor_id(value: &serde_json::Value) -> Option<i64> {
    let id = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}
