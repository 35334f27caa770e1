//! Seed data loading.
//!
//! A seed file is a JSON array of historical appointments:
//!
//! ```json
//! [{"id": 1, "trainer_id": 1, "user_id": 2,
//!   "started_at": "2019-01-24T09:00:00-08:00", "ended_at": "2019-01-24T09:30:00-08:00"}]
//! ```
//!
//! Seed entries skip booking validation but still go through the repository,
//! so the `(trainer_id, starts_at)` uniqueness rule applies to them too.

use std::path::Path;

use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use trainerbook_core::{
    errors::RepositoryError, models::appointment::NewAppointment,
    repository::AppointmentRepository,
};

use crate::repositories::appointment::{PgAppointmentRepository, count_appointments};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAppointment {
    /// Identifier from the source data; the repository assigns its own.
    pub id: Option<i64>,
    pub trainer_id: i64,
    pub user_id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl From<SeedAppointment> for NewAppointment {
    fn from(seed: SeedAppointment) -> Self {
        NewAppointment {
            trainer_id: seed.trainer_id,
            user_id: seed.user_id,
            starts_at: seed.started_at,
            ends_at: seed.ended_at,
        }
    }
}

pub async fn read_seed_file(path: &Path) -> Result<Vec<SeedAppointment>> {
    let data = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read seed file {}", path.display()))?;

    serde_json::from_slice(&data)
        .wrap_err_with(|| format!("Invalid seed file {}", path.display()))
}

/// Inserts every seed entry and returns how many were stored.
///
/// Entries that collide with an existing booking are skipped with a warning.
pub async fn insert_seed_appointments(
    repository: &dyn AppointmentRepository,
    seeds: Vec<SeedAppointment>,
) -> Result<usize> {
    let mut inserted = 0;
    for seed in seeds {
        let source_id = seed.id;
        match repository.create(seed.into()).await {
            Ok(_) => inserted += 1,
            Err(RepositoryError::UniqueViolation) => {
                warn!(?source_id, "Skipping seed appointment for an already booked slot");
            }
            Err(RepositoryError::Other(report)) => {
                return Err(report.wrap_err("Failed to insert seed appointment"));
            }
        }
    }
    Ok(inserted)
}

/// Seeds an empty `appointments` table from `path`; does nothing otherwise.
pub async fn seed_database(pool: &Pool<Postgres>, path: &Path) -> Result<usize> {
    let count = count_appointments(pool).await?;
    if count > 0 {
        info!("Database already contains data, skipping seed");
        return Ok(0);
    }

    let seeds = read_seed_file(path).await?;
    let repository = PgAppointmentRepository::new(pool.clone());
    let inserted = insert_seed_appointments(&repository, seeds).await?;

    info!("Seeded {} appointments from {}", inserted, path.display());
    Ok(inserted)
}
