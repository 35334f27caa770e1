use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use tracing::info;

/// Name of the uniqueness constraint that rejects double bookings.
pub const TRAINER_START_CONSTRAINT: &str = "appointments_trainer_start_key";

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id BIGSERIAL PRIMARY KEY,
            trainer_id BIGINT NOT NULL,
            user_id BIGINT NOT NULL,
            starts_at TIMESTAMP WITH TIME ZONE NOT NULL,
            ends_at TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (ends_at > starts_at),
            CONSTRAINT appointments_trainer_start_key UNIQUE (trainer_id, starts_at)
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create appointments table")?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_appointments_trainer_id ON appointments(trainer_id);
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create appointment indexes")?;

    info!("Database schema initialized successfully.");
    Ok(())
}
