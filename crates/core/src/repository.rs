use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    errors::RepositoryError,
    models::appointment::{Appointment, NewAppointment},
};

/// Storage collaborator of the availability engine.
///
/// Implementations must enforce uniqueness of `(trainer_id, starts_at)`
/// atomically and report a violation as [`RepositoryError::UniqueViolation`].
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// All appointments of `trainer_id` with `starts_at` in `[start, end)`.
    async fn find_by_trainer_and_start_range(
        &self,
        trainer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError>;

    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, RepositoryError>;

    /// All appointments of `trainer_id`, ordered by start.
    async fn find_by_trainer(&self, trainer_id: i64) -> Result<Vec<Appointment>, RepositoryError>;
}
