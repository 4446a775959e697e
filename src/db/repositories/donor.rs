//! Donor repository
//!
//! Database operations for the `donors` table.
//!
//! This module provides:
//! - `DonorRepository` trait defining the interface for donor data access
//! - `SqlxDonorRepository` implementing the trait for SQLite
//!
//! The UNIQUE constraint on `student_id` is enforced here by the database;
//! callers detect it with [`crate::db::is_unique_violation`].

use crate::models::{Donor, DonorChanges, DonorSummary, NewDonor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

const DONOR_COLUMNS: &str =
    "id, student_id, name, blood_group, address, phone_number, level, term, created_at";

/// Donor repository trait
#[async_trait]
pub trait DonorRepository: Send + Sync {
    /// Insert a donor; fails with a unique violation on a taken `student_id`
    async fn create(&self, donor: &NewDonor) -> Result<Donor>;

    /// All donors ordered by name
    async fn list(&self) -> Result<Vec<Donor>>;

    /// Donors with exactly this blood group, ordered by name
    async fn list_by_blood_group(&self, blood_group: &str) -> Result<Vec<Donor>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Donor>>;

    /// Returns `false` when no row has this id
    async fn update(&self, id: i64, changes: &DonorChanges) -> Result<bool>;

    /// Returns `false` when no row has this id
    async fn delete(&self, id: i64) -> Result<bool>;

    /// All donors with last donation date and donation count, ordered by name
    async fn list_with_summary(&self) -> Result<Vec<DonorSummary>>;
}

/// SQLx-based donor repository implementation
pub struct SqlxDonorRepository {
    pool: SqlitePool,
}

impl SqlxDonorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn DonorRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl DonorRepository for SqlxDonorRepository {
    async fn create(&self, donor: &NewDonor) -> Result<Donor> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO donors (student_id, name, blood_group, address, phone_number, level, term, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&donor.student_id)
        .bind(&donor.name)
        .bind(donor.blood_group.as_str())
        .bind(&donor.address)
        .bind(&donor.phone_number)
        .bind(&donor.level)
        .bind(&donor.term)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create donor")?;

        Ok(Donor {
            id: result.last_insert_rowid(),
            student_id: donor.student_id.clone(),
            name: donor.name.clone(),
            blood_group: donor.blood_group.to_string(),
            address: donor.address.clone(),
            phone_number: donor.phone_number.clone(),
            level: donor.level.clone(),
            term: donor.term.clone(),
            created_at: now,
        })
    }

    async fn list(&self) -> Result<Vec<Donor>> {
        let rows = sqlx::query(&format!(
            "SELECT {DONOR_COLUMNS} FROM donors ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list donors")?;
        rows.iter().map(row_to_donor).collect()
    }

    async fn list_by_blood_group(&self, blood_group: &str) -> Result<Vec<Donor>> {
        let rows = sqlx::query(&format!(
            "SELECT {DONOR_COLUMNS} FROM donors WHERE blood_group = ? ORDER BY name, id"
        ))
        .bind(blood_group)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search donors")?;
        rows.iter().map(row_to_donor).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Donor>> {
        let row = sqlx::query(&format!("SELECT {DONOR_COLUMNS} FROM donors WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get donor")?;
        row.as_ref().map(row_to_donor).transpose()
    }

    async fn update(&self, id: i64, changes: &DonorChanges) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE donors SET name = ?, address = ?, phone_number = ?, level = ?, term = ? WHERE id = ?",
        )
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(&changes.phone_number)
        .bind(&changes.level)
        .bind(&changes.term)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update donor")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM donors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete donor")?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_with_summary(&self) -> Result<Vec<DonorSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT d.id, d.student_id, d.name, d.blood_group, d.address, d.phone_number,
                   d.level, d.term, d.created_at,
                   MAX(dn.donation_date) AS last_donation_date,
                   COUNT(dn.id) AS total_donations
            FROM donors d
            LEFT JOIN donations dn ON d.id = dn.donor_id
            GROUP BY d.id
            ORDER BY d.name, d.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list donors with donation summary")?;

        rows.iter()
            .map(|row| {
                Ok(DonorSummary {
                    donor: row_to_donor(row)?,
                    last_donation_date: row.try_get("last_donation_date")?,
                    total_donations: row.try_get("total_donations")?,
                })
            })
            .collect()
    }
}

fn row_to_donor(row: &SqliteRow) -> Result<Donor> {
    Ok(Donor {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        name: row.try_get("name")?,
        blood_group: row.try_get("blood_group")?,
        address: row.try_get("address")?,
        phone_number: row.try_get("phone_number")?,
        level: row.try_get("level")?,
        term: row.try_get("term")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, is_unique_violation, migrations};
    use crate::models::BloodGroup;
    use chrono::NaiveDate;

    async fn setup() -> (SqlitePool, SqlxDonorRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (pool.clone(), SqlxDonorRepository::new(pool))
    }

    fn new_donor(student_id: &str, name: &str, blood_group: BloodGroup) -> NewDonor {
        NewDonor {
            student_id: student_id.to_string(),
            name: name.to_string(),
            blood_group,
            address: "Hall 3".to_string(),
            phone_number: "0123456789".to_string(),
            level: "2".to_string(),
            term: "1".to_string(),
        }
    }

    async fn add_donation(pool: &SqlitePool, donor_id: i64, date: NaiveDate) {
        sqlx::query("INSERT INTO donations (donor_id, donation_date) VALUES (?, ?)")
            .bind(donor_id)
            .bind(date)
            .execute(pool)
            .await
            .expect("Failed to insert donation");
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_pool, repo) = setup().await;

        let created = repo
            .create(&new_donor("S100", "Ada", BloodGroup::OPositive))
            .await
            .expect("Failed to create donor");
        assert!(created.id > 0);
        assert_eq!(created.blood_group, "O+");

        let fetched = repo.get_by_id(created.id).await.unwrap().expect("Donor should exist");
        assert_eq!(fetched.student_id, "S100");
        assert_eq!(fetched.name, "Ada");
        assert_eq!(fetched.created_at.timestamp(), created.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_duplicate_student_id_is_unique_violation() {
        let (_pool, repo) = setup().await;

        repo.create(&new_donor("S1", "Ada", BloodGroup::APositive)).await.unwrap();
        let err = repo
            .create(&new_donor("S1", "Bob", BloodGroup::BPositive))
            .await
            .expect_err("Duplicate student id should fail");

        assert!(is_unique_violation(&err));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let (_pool, repo) = setup().await;

        for (sid, name) in [("S1", "Charlie"), ("S2", "Ada"), ("S3", "Bob")] {
            repo.create(&new_donor(sid, name, BloodGroup::APositive)).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Ada", "Bob", "Charlie"]);
    }

    #[tokio::test]
    async fn test_list_by_blood_group() {
        let (_pool, repo) = setup().await;

        repo.create(&new_donor("S1", "Zed", BloodGroup::OPositive)).await.unwrap();
        repo.create(&new_donor("S2", "Amy", BloodGroup::ONegative)).await.unwrap();
        repo.create(&new_donor("S3", "Ben", BloodGroup::OPositive)).await.unwrap();

        let found = repo.list_by_blood_group("O+").await.unwrap();
        let names: Vec<&str> = found.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Ben", "Zed"]);

        assert!(repo.list_by_blood_group("AB-").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_missing_update() {
        let (_pool, repo) = setup().await;
        let donor = repo.create(&new_donor("S1", "Ada", BloodGroup::APositive)).await.unwrap();

        let changes = DonorChanges {
            name: "Ada Lovelace".to_string(),
            address: "New Hall".to_string(),
            phone_number: "999".to_string(),
            level: "3".to_string(),
            term: "2".to_string(),
        };
        assert!(repo.update(donor.id, &changes).await.unwrap());
        assert!(!repo.update(donor.id + 100, &changes).await.unwrap());

        let updated = repo.get_by_id(donor.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.level, "3");
        assert_eq!(updated.student_id, "S1");
    }

    #[tokio::test]
    async fn test_delete() {
        let (_pool, repo) = setup().await;
        let donor = repo.create(&new_donor("S1", "Ada", BloodGroup::APositive)).await.unwrap();

        assert!(repo.delete(donor.id).await.unwrap());
        assert!(!repo.delete(donor.id).await.unwrap());
        assert!(repo.get_by_id(donor.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_with_summary() {
        let (pool, repo) = setup().await;
        let ada = repo.create(&new_donor("S1", "Ada", BloodGroup::APositive)).await.unwrap();
        let bob = repo.create(&new_donor("S2", "Bob", BloodGroup::BPositive)).await.unwrap();

        add_donation(&pool, ada.id, NaiveDate::from_ymd_opt(2023, 12, 24).unwrap()).await;
        add_donation(&pool, ada.id, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).await;
        add_donation(&pool, ada.id, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()).await;

        let summaries = repo.list_with_summary().await.unwrap();
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].donor.id, ada.id);
        assert_eq!(summaries[0].total_donations, 3);
        assert_eq!(summaries[0].last_donation_date, NaiveDate::from_ymd_opt(2024, 3, 1));

        assert_eq!(summaries[1].donor.id, bob.id);
        assert_eq!(summaries[1].total_donations, 0);
        assert_eq!(summaries[1].last_donation_date, None);
    }
}
