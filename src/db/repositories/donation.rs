//! Donation repository
//!
//! Database operations for the `donations` table. Rows are only ever
//! inserted and read here; removal happens through the cascade on
//! `donors`.

use crate::models::Donation;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Insert a donation; fails with a foreign key violation for an unknown donor
    async fn create(&self, donor_id: i64, donation_date: NaiveDate) -> Result<Donation>;

    /// Donations of one donor, newest date first
    async fn list_by_donor(&self, donor_id: i64) -> Result<Vec<Donation>>;
}

pub struct SqlxDonationRepository {
    pool: SqlitePool,
}

impl SqlxDonationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn DonationRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl DonationRepository for SqlxDonationRepository {
    async fn create(&self, donor_id: i64, donation_date: NaiveDate) -> Result<Donation> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO donations (donor_id, donation_date, created_at) VALUES (?, ?, ?)",
        )
        .bind(donor_id)
        .bind(donation_date)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to record donation")?;

        Ok(Donation {
            id: result.last_insert_rowid(),
            donor_id,
            donation_date,
            created_at: now,
        })
    }

    async fn list_by_donor(&self, donor_id: i64) -> Result<Vec<Donation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, donor_id, donation_date, created_at
            FROM donations
            WHERE donor_id = ?
            ORDER BY donation_date DESC, id DESC
            "#,
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list donations")?;
        rows.iter().map(row_to_donation).collect()
    }
}

fn row_to_donation(row: &SqliteRow) -> Result<Donation> {
    Ok(Donation {
        id: row.try_get("id")?,
        donor_id: row.try_get("donor_id")?,
        donation_date: row.try_get("donation_date")?,
        created_at: row.try_get("created_at")?,
    })
}
