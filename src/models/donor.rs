//! Donor model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// ABO/Rh blood groups accepted at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BloodGroup {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BloodGroup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Invalid blood group: {}", s))
    }
}

/// Registered donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    /// Stored as free text, one of [`BloodGroup`] for rows created through registration
    pub blood_group: String,
    pub address: String,
    pub phone_number: String,
    pub level: String,
    pub term: String,
    pub created_at: DateTime<Utc>,
}

/// Donor row augmented with its donation history summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorSummary {
    #[serde(flatten)]
    pub donor: Donor,
    /// Latest donation date, `None` when the donor never donated
    pub last_donation_date: Option<NaiveDate>,
    pub total_donations: i64,
}

/// Validated fields for a new donor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonor {
    pub student_id: String,
    pub name: String,
    pub blood_group: BloodGroup,
    pub address: String,
    pub phone_number: String,
    pub level: String,
    pub term: String,
}

/// Validated fields for a donor update
///
/// `student_id` and `blood_group` are fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorChanges {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub level: String,
    pub term: String,
}

/// Raw registration payload; every field is required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDonorInput {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub level: Option<String>,
    pub term: Option<String>,
}

/// Raw update payload; every field is required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDonorInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub level: Option<String>,
    pub term: Option<String>,
}
