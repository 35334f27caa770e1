use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use trainerbook_core::{
    errors::RepositoryError,
    models::appointment::{Appointment, NewAppointment},
    repository::AppointmentRepository,
};

use crate::{models::DbAppointment, schema::TRAINER_START_CONSTRAINT};

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<DbAppointment, RepositoryError> {
    tracing::debug!(
        "Creating appointment: trainer_id={}, user_id={}, starts_at={}",
        appointment.trainer_id,
        appointment.user_id,
        appointment.starts_at
    );

    sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (trainer_id, user_id, starts_at, ends_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, trainer_id, user_id, starts_at, ends_at, created_at
        "#,
    )
    .bind(appointment.trainer_id)
    .bind(appointment.user_id)
    .bind(appointment.starts_at)
    .bind(appointment.ends_at)
    .fetch_one(pool)
    .await
    .map_err(classify_insert_error)
}

pub async fn get_appointments_by_trainer_in_range(
    pool: &Pool<Postgres>,
    trainer_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, trainer_id, user_id, starts_at, ends_at, created_at
        FROM appointments
        WHERE trainer_id = $1 AND starts_at >= $2 AND starts_at < $3
        ORDER BY starts_at ASC
        "#,
    )
    .bind(trainer_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .wrap_err("Failed to fetch appointments")?;

    Ok(appointments)
}

pub async fn get_appointments_by_trainer(
    pool: &Pool<Postgres>,
    trainer_id: i64,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, trainer_id, user_id, starts_at, ends_at, created_at
        FROM appointments
        WHERE trainer_id = $1
        ORDER BY starts_at ASC
        "#,
    )
    .bind(trainer_id)
    .fetch_all(pool)
    .await
    .wrap_err("Failed to fetch appointments")?;

    Ok(appointments)
}

pub async fn count_appointments(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

// Only the (trainer_id, starts_at) constraint means the slot is taken; any
// other violation is unexpected and reported as a plain failure.
fn classify_insert_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(TRAINER_START_CONSTRAINT) {
            return RepositoryError::UniqueViolation;
        }
    }
    RepositoryError::Other(eyre::Report::new(err).wrap_err("Failed to create appointment"))
}

/// PostgreSQL-backed [`AppointmentRepository`].
#[derive(Debug, Clone)]
pub struct PgAppointmentRepository {
    pool: Pool<Postgres>,
}

impl PgAppointmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn find_by_trainer_and_start_range(
        &self,
        trainer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let rows = get_appointments_by_trainer_in_range(&self.pool, trainer_id, start, end).await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, RepositoryError> {
        let row = create_appointment(&self.pool, &appointment).await?;
        Ok(row.into())
    }

    async fn find_by_trainer(&self, trainer_id: i64) -> Result<Vec<Appointment>, RepositoryError> {
        let rows = get_appointments_by_trainer(&self.pool, trainer_id).await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::create_test_pool;
    use chrono::TimeZone;

    fn slot(trainer_id: i64, hour: u32) -> NewAppointment {
        let starts_at = Utc.with_ymd_and_hms(2019, 1, 24, hour, 0, 0).unwrap();
        NewAppointment {
            trainer_id,
            user_id: 100,
            starts_at,
            ends_at: starts_at + chrono::Duration::minutes(30),
        }
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn duplicate_start_is_a_unique_violation() {
        let pool = create_test_pool().await;
        sqlx::query("DELETE FROM appointments").execute(&pool).await.unwrap();
        let repo = PgAppointmentRepository::new(pool);

        let created = repo.create(slot(1, 17)).await.unwrap();
        assert_eq!(created.trainer_id, 1);

        let duplicate = repo.create(slot(1, 17)).await;
        assert!(matches!(duplicate, Err(RepositoryError::UniqueViolation)));

        // Same instant for a different trainer is fine.
        assert!(repo.create(slot(2, 17)).await.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn range_query_is_half_open() {
        let pool = create_test_pool().await;
        sqlx::query("DELETE FROM appointments").execute(&pool).await.unwrap();
        let repo = PgAppointmentRepository::new(pool);

        repo.create(slot(1, 17)).await.unwrap();
        repo.create(slot(1, 18)).await.unwrap();

        let start = Utc.with_ymd_and_hms(2019, 1, 24, 17, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 24, 18, 0, 0).unwrap();
        let found = repo.find_by_trainer_and_start_range(1, start, end).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].starts_at, start);
    }
}
