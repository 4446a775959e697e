//! Donation model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub donor_id: i64,
    pub donation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Raw payload for recording a donation
///
/// `donor_id` accepts a JSON number or a numeric string, the date is
/// `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordDonationInput {
    pub donor_id: Option<serde_json::Value>,
    pub donation_date: Option<String>,
}
