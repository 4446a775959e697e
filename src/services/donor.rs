//! Donor service
//!
//! Business rules for the donor registry:
//! - registration with required-field and blood group validation
//! - public listing and search by blood group
//! - update and delete by id
//! - admin listing with donation summaries
//!
//! Field validation runs before any statement reaches the store. The store
//! itself owns the `student_id` uniqueness rule; a violation surfaces here as
//! [`DonorServiceError::DuplicateStudentId`].

use crate::db::is_unique_violation;
use crate::db::repositories::DonorRepository;
use crate::models::{BloodGroup, CreateDonorInput, Donor, DonorChanges, DonorSummary, NewDonor, UpdateDonorInput};
use crate::services::validation::RequiredFields;
use std::sync::Arc;

/// Error types for donor service operations
#[derive(Debug, thiserror::Error)]
pub enum DonorServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    ValidationError(String),

    /// `student_id` already registered
    #[error("Student ID already registered: {0}")]
    DuplicateStudentId(String),

    #[error("Donor not found")]
    NotFound,

    /// Storage failure
    #[error("{0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct DonorService {
    repo: Arc<dyn DonorRepository>,
}

impl DonorService {
    pub fn new(repo: Arc<dyn DonorRepository>) -> Self {
        Self { repo }
    }

    /// Register a new donor
    ///
    /// # Errors
    ///
    /// - `ValidationError` if a field is absent/blank or the blood group is unknown
    /// - `DuplicateStudentId` if the student id is taken; no row is created
    /// - `InternalError` for database errors
    pub async fn register(&self, input: CreateDonorInput) -> Result<Donor, DonorServiceError> {
        let donor = validate_new_donor(input)?;

        match self.repo.create(&donor).await {
            Ok(created) => {
                tracing::info!(
                    donor_id = created.id,
                    blood_group = %created.blood_group,
                    "Donor registered"
                );
                Ok(created)
            }
            Err(e) if is_unique_violation(&e) => {
                Err(DonorServiceError::DuplicateStudentId(donor.student_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All donors ordered by name
    pub async fn list(&self) -> Result<Vec<Donor>, DonorServiceError> {
        Ok(self.repo.list().await?)
    }

    /// Donors whose blood group equals `blood_group`, ordered by name
    ///
    /// An unknown group is not an error; it simply matches nobody.
    pub async fn search_by_blood_group(&self, blood_group: &str) -> Result<Vec<Donor>, DonorServiceError> {
        Ok(self.repo.list_by_blood_group(blood_group.trim()).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Donor, DonorServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(DonorServiceError::NotFound)
    }

    /// Replace the mutable fields of a donor
    pub async fn update(&self, id: i64, input: UpdateDonorInput) -> Result<(), DonorServiceError> {
        let changes = validate_changes(input)?;

        if self.repo.update(id, &changes).await? {
            tracing::info!(donor_id = id, "Donor updated");
            Ok(())
        } else {
            Err(DonorServiceError::NotFound)
        }
    }

    /// Delete a donor and, through the cascade, all of their donations
    pub async fn delete(&self, id: i64) -> Result<(), DonorServiceError> {
        if self.repo.delete(id).await? {
            tracing::info!(donor_id = id, "Donor deleted");
            Ok(())
        } else {
            Err(DonorServiceError::NotFound)
        }
    }

    /// All donors with last donation date and total donations
    pub async fn list_with_summary(&self) -> Result<Vec<DonorSummary>, DonorServiceError> {
        Ok(self.repo.list_with_summary().await?)
    }
}

fn validate_new_donor(input: CreateDonorInput) -> Result<NewDonor, DonorServiceError> {
    let mut fields = RequiredFields::new();
    let student_id = fields.take("student_id", input.student_id);
    let name = fields.take("name", input.name);
    let blood_group = fields.take("blood_group", input.blood_group);
    let address = fields.take("address", input.address);
    let phone_number = fields.take("phone_number", input.phone_number);
    let level = fields.take("level", input.level);
    let term = fields.take("term", input.term);
    fields.finish().map_err(DonorServiceError::ValidationError)?;

    let blood_group = blood_group
        .parse::<BloodGroup>()
        .map_err(|e| DonorServiceError::ValidationError(e.to_string()))?;

    Ok(NewDonor {
        student_id,
        name,
        blood_group,
        address,
        phone_number,
        level,
        term,
    })
}

fn validate_changes(input: UpdateDonorInput) -> Result<DonorChanges, DonorServiceError> {
    let mut fields = RequiredFields::new();
    let changes = DonorChanges {
        name: fields.take("name", input.name),
        address: fields.take("address", input.address),
        phone_number: fields.take("phone_number", input.phone_number),
        level: fields.take("level", input.level),
        term: fields.take("term", input.term),
    };
    fields.finish().map_err(DonorServiceError::ValidationError)?;
    Ok(changes)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::db::repositories::SqlxDonorRepository;
    use crate::db::{create_test_pool, migrations};
    use proptest::prelude::*;

    fn blood_group_strategy() -> impl Strategy<Value = BloodGroup> {
        prop::sample::select(BloodGroup::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Search returns exactly the donors of that group, sorted by name.
        #[test]
        fn search_returns_exact_sorted_subset(
            donors in prop::collection::vec(("[A-Z][a-z]{2,8}", blood_group_strategy()), 0..12),
            query in blood_group_strategy(),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let pool = create_test_pool().await.expect("Failed to create test pool");
                migrations::run_migrations(&pool).await.expect("Failed to run migrations");
                let service = DonorService::new(SqlxDonorRepository::boxed(pool));

                for (i, (name, group)) in donors.iter().enumerate() {
                    service.register(CreateDonorInput {
                        student_id: Some(format!("S{i}")),
                        name: Some(name.clone()),
                        blood_group: Some(group.to_string()),
                        address: Some("X".to_string()),
                        phone_number: Some("1".to_string()),
                        level: Some("1".to_string()),
                        term: Some("1".to_string()),
                    }).await.expect("Register should succeed");
                }

                let found = service.search_by_blood_group(query.as_str()).await.unwrap();
                let expected = donors.iter().filter(|(_, g)| *g == query).count();

                prop_assert_eq!(found.len(), expected);
                prop_assert!(found.iter().all(|d| d.blood_group == query.as_str()));
                prop_assert!(found.windows(2).all(|w| w[0].name <= w[1].name));
                Ok(())
            });
            result?;
        }
    }
}
